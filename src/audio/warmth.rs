//! Warmth mastering pass
//!
//! A subtle analog-flavored chain applied to the finished mix: low shelf
//! boost, high shelf roll-off, a gentle lowpass, slow chorus drift, a touch
//! of room echo, slow compression, and makeup gain. Every stage is driven
//! by [`WarmthConfig`]; the defaults are tuned to be barely audible on
//! their own and to add up to a rounder, less clinical master.

use crate::config::{ToolsConfig, WarmthConfig};
use crate::error::{AudioError, Error, Result};
use crate::utils::filter_num;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Applies the warmth chain to a rendered mix
pub struct WarmthProcessor {
    config: WarmthConfig,
    output_bitrate: String,
    ffmpeg: PathBuf,
}

impl WarmthProcessor {
    /// Create a processor with an explicit ffmpeg path
    ///
    /// `output_bitrate` is the re-encode bitrate, normally the mixer's.
    pub fn new(config: WarmthConfig, output_bitrate: String, ffmpeg: PathBuf) -> Self {
        Self {
            config,
            output_bitrate,
            ffmpeg,
        }
    }

    /// Create a processor, resolving ffmpeg through the tools config
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] when ffmpeg cannot be resolved.
    pub fn discover(
        config: WarmthConfig,
        output_bitrate: String,
        tools: &ToolsConfig,
    ) -> Result<Self> {
        let ffmpeg = tools.ffmpeg()?;
        Ok(Self::new(config, output_bitrate, ffmpeg))
    }

    /// Run `input` through the warmth chain, writing to `output`
    ///
    /// When `input` and `output` are the same path, the result is staged to
    /// a sibling temp file and renamed into place, so a failed run never
    /// clobbers the source.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::WarmthFailed`] when ffmpeg exits non-zero.
    pub async fn process(&self, input: &Path, output: &Path) -> Result<PathBuf> {
        let in_place = input == output;
        let target = if in_place {
            staging_path(output)
        } else {
            output.to_path_buf()
        };

        let chain = build_filter_chain(&self.config);
        debug!(filter = %chain, "applying warmth chain");

        let processed = Command::new(&self.ffmpeg)
            .args(["-y", "-hide_banner", "-loglevel", "error", "-i"])
            .arg(input)
            .arg("-af")
            .arg(&chain)
            .arg("-b:a")
            .arg(&self.output_bitrate)
            .arg(&target)
            .output()
            .await
            .map_err(|e| Error::ExternalTool(format!("failed to execute ffmpeg: {e}")))?;

        if !processed.status.success() {
            if in_place {
                let _ = tokio::fs::remove_file(&target).await;
            }
            return Err(AudioError::WarmthFailed {
                stderr: String::from_utf8_lossy(&processed.stderr)
                    .trim()
                    .to_string(),
            }
            .into());
        }

        if in_place {
            tokio::fs::rename(&target, output).await?;
        }

        info!(output = %output.display(), "warmth pass applied");
        Ok(output.to_path_buf())
    }
}

/// Build the `-af` filter chain from the warmth settings
///
/// Stage order matters: EQ shapes the tone first, modulation and echo add
/// movement, and compression plus makeup gain come last so they act on the
/// already-colored signal.
pub(crate) fn build_filter_chain(config: &WarmthConfig) -> String {
    // The chorus filter wants depth in milliseconds; config depth is
    // normalized 0..1, scaled here to a sub-millisecond tape-wow range.
    let chorus_depth_ms = filter_num(config.chorus_depth * 10.0);
    // acompressor takes a linear threshold, not dB.
    let threshold = filter_num(10f64.powf(config.compressor_threshold_db / 20.0));

    [
        format!(
            "bass=g={}:f={}",
            filter_num(config.low_shelf_gain_db),
            filter_num(config.low_shelf_freq_hz)
        ),
        format!(
            "treble=g={}:f={}",
            filter_num(config.high_shelf_gain_db),
            filter_num(config.high_shelf_freq_hz)
        ),
        format!("lowpass=f={}", filter_num(config.lowpass_freq_hz)),
        format!(
            "chorus=0.9:{}:40:0.4:{}:{}",
            filter_num(config.chorus_mix),
            filter_num(config.chorus_rate_hz),
            chorus_depth_ms
        ),
        format!(
            "aecho=1:1:{}:{}",
            filter_num(config.echo_delay_ms),
            filter_num(config.echo_decay)
        ),
        format!(
            "acompressor=threshold={}:ratio={}",
            threshold,
            filter_num(config.compressor_ratio)
        ),
        format!("volume={}dB", filter_num(config.makeup_gain_db)),
    ]
    .join(",")
}

/// Sibling temp path used for in-place processing
pub(crate) fn staging_path(output: &Path) -> PathBuf {
    match output.extension().and_then(|e| e.to_str()) {
        Some(ext) => output.with_extension(format!("tmp.{ext}")),
        None => output.with_extension("tmp"),
    }
}
