//! Mix rendering: loudness normalization plus cut or crossfade joins
//!
//! Everything happens in a single ffmpeg invocation. Each input is first
//! run through `loudnorm` toward the configured loudness target, then the
//! normalized streams are either concatenated back to back (cut) or folded
//! together with chained `acrossfade` stages. The final stream always
//! carries the `[mix]` label, which is what gets mapped to the output.

use crate::config::{MixerConfig, ToolsConfig, Transition};
use crate::error::{AudioError, Error, Result};
use crate::utils::{filter_num, format_timestamp};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// A rendered mix and its measured duration
#[derive(Clone, Debug)]
pub struct MixedAudio {
    /// Path of the rendered file
    pub path: PathBuf,
    /// Duration in seconds, as reported by ffprobe
    pub duration_secs: f64,
}

/// Renders downloaded tracks into one continuous mix
pub struct AudioMixer {
    config: MixerConfig,
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl AudioMixer {
    /// Create a mixer with explicit binary paths
    pub fn new(config: MixerConfig, ffmpeg: PathBuf, ffprobe: PathBuf) -> Self {
        Self {
            config,
            ffmpeg,
            ffprobe,
        }
    }

    /// Create a mixer, resolving ffmpeg and ffprobe through the tools config
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] when either binary cannot be resolved.
    pub fn discover(config: MixerConfig, tools: &ToolsConfig) -> Result<Self> {
        Ok(Self::new(config, tools.ffmpeg()?, tools.ffprobe()?))
    }

    /// Render `inputs` into a single mix at `output`
    ///
    /// Inputs are joined in the order given. The output format follows the
    /// extension of `output`; the configured bitrate is applied.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::NoInputs`] for an empty input list,
    /// [`AudioError::MixFailed`] when ffmpeg exits non-zero, and
    /// [`AudioError::ProbeFailed`] when the rendered file's duration cannot
    /// be read back.
    pub async fn mix(&self, inputs: &[PathBuf], output: &Path) -> Result<MixedAudio> {
        if inputs.is_empty() {
            return Err(AudioError::NoInputs.into());
        }
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let graph = build_filter_graph(
            inputs.len(),
            self.config.transition,
            self.config.crossfade_duration_ms,
            self.config.target_loudness_dbfs,
        );
        debug!(
            inputs = inputs.len(),
            transition = ?self.config.transition,
            "rendering mix"
        );

        let mut command = Command::new(&self.ffmpeg);
        command.args(["-y", "-hide_banner", "-loglevel", "error"]);
        for input in inputs {
            command.arg("-i").arg(input);
        }
        command
            .arg("-filter_complex")
            .arg(&graph)
            .args(["-map", "[mix]", "-b:a"])
            .arg(&self.config.output_bitrate)
            .arg(output);

        let rendered = command
            .output()
            .await
            .map_err(|e| Error::ExternalTool(format!("failed to execute ffmpeg: {e}")))?;
        if !rendered.status.success() {
            return Err(AudioError::MixFailed {
                stderr: String::from_utf8_lossy(&rendered.stderr).trim().to_string(),
            }
            .into());
        }

        let duration_secs = self.probe_duration(output).await?;
        info!(
            tracks = inputs.len(),
            output = %output.display(),
            length = %format_timestamp(duration_secs as u64),
            "mix rendered"
        );

        Ok(MixedAudio {
            path: output.to_path_buf(),
            duration_secs,
        })
    }

    /// Read the duration of an audio file in seconds
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::ProbeFailed`] when ffprobe exits non-zero or
    /// reports something that does not parse as a number.
    pub async fn probe_duration(&self, path: &Path) -> Result<f64> {
        let probed = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| Error::ExternalTool(format!("failed to execute ffprobe: {e}")))?;

        if !probed.status.success() {
            return Err(AudioError::ProbeFailed {
                path: path.to_path_buf(),
                detail: String::from_utf8_lossy(&probed.stderr).trim().to_string(),
            }
            .into());
        }

        let raw = String::from_utf8_lossy(&probed.stdout);
        parse_duration_output(&raw).ok_or_else(|| {
            AudioError::ProbeFailed {
                path: path.to_path_buf(),
                detail: format!("unparseable duration '{}'", raw.trim()),
            }
            .into()
        })
    }
}

/// Build the `-filter_complex` graph for a mix
///
/// Each input gets a `loudnorm` stage labeled `[aN]`; the join stage then
/// produces `[mix]`. A single input skips the join entirely.
pub(crate) fn build_filter_graph(
    inputs: usize,
    transition: Transition,
    crossfade_ms: u64,
    target_dbfs: f64,
) -> String {
    let loudnorm = format!("loudnorm=I={}:TP=-1.5:LRA=11", filter_num(target_dbfs));

    if inputs == 1 {
        return format!("[0:a]{loudnorm}[mix]");
    }

    let mut stages: Vec<String> = (0..inputs)
        .map(|i| format!("[{i}:a]{loudnorm}[a{i}]"))
        .collect();

    match transition {
        Transition::Cut => {
            let labels: String = (0..inputs).map(|i| format!("[a{i}]")).collect();
            stages.push(format!("{labels}concat=n={inputs}:v=0:a=1[mix]"));
        }
        Transition::Crossfade => {
            let overlap = filter_num(crossfade_ms as f64 / 1000.0);
            let mut prev = "a0".to_string();
            for i in 1..inputs {
                let next = if i == inputs - 1 {
                    "mix".to_string()
                } else {
                    format!("x{i}")
                };
                stages.push(format!("[{prev}][a{i}]acrossfade=d={overlap}[{next}]"));
                prev = next;
            }
        }
    }

    stages.join(";")
}

/// Parse ffprobe's duration line into seconds
pub(crate) fn parse_duration_output(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|d| d.is_finite())
}
