//! Video composition: still artwork plus the mixed audio
//!
//! The composer produces two artifacts per run:
//!
//! 1. The video itself: the clean artwork looped for the length of the mix,
//!    scaled and padded to the output resolution, faded in from black, with
//!    an optional audio visualizer overlaid in a corner.
//! 2. A platform thumbnail: the artwork with the mood word rendered across
//!    the center via `drawtext`. The video deliberately uses the clean
//!    image; the text belongs on the thumbnail only.
//!
//! All filter graphs are assembled by pure functions so the exact strings
//! handed to ffmpeg can be asserted in tests.

use crate::config::{
    HorizontalPosition, OverlayConfig, ToolsConfig, VerticalPosition, VideoConfig,
    VisualizerConfig, VisualizerStyle,
};
use crate::error::{ComposeError, Error, Result};
use crate::utils::filter_num;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// The rendered video and its companion thumbnail
#[derive(Clone, Debug)]
pub struct ComposedVideo {
    /// Path of the rendered video
    pub video_path: PathBuf,
    /// Path of the text-overlaid thumbnail image
    pub thumbnail_path: PathBuf,
}

/// Composes the final video from artwork and mixed audio
pub struct VideoComposer {
    video: VideoConfig,
    overlay: OverlayConfig,
    visualizer: VisualizerConfig,
    ffmpeg: PathBuf,
}

impl VideoComposer {
    /// Create a composer with an explicit ffmpeg path
    pub fn new(
        video: VideoConfig,
        overlay: OverlayConfig,
        visualizer: VisualizerConfig,
        ffmpeg: PathBuf,
    ) -> Self {
        Self {
            video,
            overlay,
            visualizer,
            ffmpeg,
        }
    }

    /// Create a composer, resolving ffmpeg through the tools config
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] when ffmpeg cannot be resolved.
    pub fn discover(
        video: VideoConfig,
        overlay: OverlayConfig,
        visualizer: VisualizerConfig,
        tools: &ToolsConfig,
    ) -> Result<Self> {
        let ffmpeg = tools.ffmpeg()?;
        Ok(Self::new(video, overlay, visualizer, ffmpeg))
    }

    /// Render `text` onto `image`, writing a PNG to `output`
    ///
    /// The text is centered, sized down automatically when it would spill
    /// past the frame margins, and decorated with the configured outline
    /// and drop shadow.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::OverlayFailed`] when ffmpeg exits non-zero.
    pub async fn render_overlay(&self, image: &Path, text: &str, output: &Path) -> Result<PathBuf> {
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let (frame_width, _) = parse_resolution(&self.video.resolution).ok_or_else(|| {
            Error::Config {
                message: format!("invalid resolution '{}'", self.video.resolution),
                key: Some("video.resolution".to_string()),
            }
        })?;
        let drawtext = build_drawtext(&self.overlay, text, frame_width);
        debug!(filter = %drawtext, "rendering text overlay");

        let rendered = Command::new(&self.ffmpeg)
            .args(["-y", "-hide_banner", "-loglevel", "error", "-i"])
            .arg(image)
            .arg("-vf")
            .arg(&drawtext)
            .args(["-frames:v", "1"])
            .arg(output)
            .output()
            .await
            .map_err(|e| Error::ExternalTool(format!("failed to execute ffmpeg: {e}")))?;

        if !rendered.status.success() {
            return Err(ComposeError::OverlayFailed {
                stderr: String::from_utf8_lossy(&rendered.stderr).trim().to_string(),
            }
            .into());
        }

        info!(text, output = %output.display(), "thumbnail overlay rendered");
        Ok(output.to_path_buf())
    }

    /// Compose the video, writing it to `output`
    ///
    /// Also produces the companion thumbnail next to the video as
    /// `{stem}_yt_thumb.png`: the artwork with `overlay_text` rendered on
    /// it, or a plain copy of the artwork when the overlay is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::EncodeFailed`] when the encode exits
    /// non-zero, or [`ComposeError::OverlayFailed`] when the thumbnail
    /// render does.
    pub async fn compose(
        &self,
        artwork: &Path,
        audio: &Path,
        overlay_text: &str,
        output: &Path,
    ) -> Result<ComposedVideo> {
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let thumbnail_path = yt_thumbnail_path(output);
        if self.overlay.enabled {
            self.render_overlay(artwork, overlay_text, &thumbnail_path)
                .await?;
        } else {
            tokio::fs::copy(artwork, &thumbnail_path).await?;
        }

        let graph = build_compose_graph(&self.video, &self.visualizer)?;
        info!(
            output = %output.display(),
            visualizer = self.visualizer.enabled,
            "composing video"
        );

        let mut command = Command::new(&self.ffmpeg);
        command
            .args(["-y", "-hide_banner", "-loglevel", "error", "-loop", "1", "-i"])
            .arg(artwork)
            .arg("-i")
            .arg(audio);
        match &graph {
            ComposeGraph::Plain(chain) => {
                command.arg("-vf").arg(chain);
            }
            ComposeGraph::WithVisualizer(chain) => {
                command
                    .arg("-filter_complex")
                    .arg(chain)
                    .args(["-map", "[vout]", "-map", "1:a"]);
            }
        }
        command
            .arg("-c:v")
            .arg(&self.video.codec)
            .arg("-preset")
            .arg(&self.video.preset)
            .arg("-crf")
            .arg(self.video.crf.to_string())
            .arg("-c:a")
            .arg(&self.video.audio_codec)
            .arg("-b:a")
            .arg(&self.video.audio_bitrate)
            .args(["-pix_fmt", "yuv420p", "-shortest", "-r"])
            .arg(self.video.fps.to_string())
            .arg(output);

        let encoded = command
            .output()
            .await
            .map_err(|e| Error::ExternalTool(format!("failed to execute ffmpeg: {e}")))?;
        if !encoded.status.success() {
            return Err(ComposeError::EncodeFailed {
                stderr: String::from_utf8_lossy(&encoded.stderr).trim().to_string(),
            }
            .into());
        }

        info!(video = %output.display(), thumbnail = %thumbnail_path.display(), "video composed");
        Ok(ComposedVideo {
            video_path: output.to_path_buf(),
            thumbnail_path,
        })
    }
}

/// Path of the companion thumbnail for a video output
pub(crate) fn yt_thumbnail_path(video_output: &Path) -> PathBuf {
    let stem = video_output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");
    video_output.with_file_name(format!("{stem}_yt_thumb.png"))
}

/// Parse a `WIDTHxHEIGHT` resolution string
pub(crate) fn parse_resolution(resolution: &str) -> Option<(u32, u32)> {
    let (w, h) = resolution.split_once('x')?;
    let width = w.trim().parse().ok().filter(|&v| v > 0)?;
    let height = h.trim().parse().ok().filter(|&v| v > 0)?;
    Some((width, height))
}

/// The video filter for a compose run
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ComposeGraph {
    /// Plain `-vf` chain on the looped artwork
    Plain(String),
    /// `-filter_complex` graph ending in `[vout]`
    WithVisualizer(String),
}

/// Build the background chain: scale, pad, and fade in from black
pub(crate) fn build_background_filter(video: &VideoConfig) -> Result<String> {
    let (width, height) = parse_resolution(&video.resolution).ok_or_else(|| Error::Config {
        message: format!("invalid resolution '{}'", video.resolution),
        key: Some("video.resolution".to_string()),
    })?;

    let mut stages = vec![
        format!("scale={width}:{height}:force_original_aspect_ratio=decrease"),
        format!("pad={width}:{height}:(ow-iw)/2:(oh-ih)/2"),
    ];
    if video.fade_in_secs > 0.0 {
        stages.push(format!("fade=t=in:st=0:d={}", filter_num(video.fade_in_secs)));
    }
    Ok(stages.join(","))
}

/// Build the visualizer source filter, fed from the audio stream
///
/// Spectrum uses its built-in palette and lissajous draws square, so the
/// color/opacity and width settings apply to the waveform and bar styles.
pub(crate) fn build_visualizer_source(config: &VisualizerConfig, fps: u32) -> String {
    let colors = format!("{}@{}", config.color, filter_num(config.opacity));
    let (width, height) = (config.width, config.height);

    match config.style {
        VisualizerStyle::Lissajous => {
            let side = config.height;
            format!("avectorscope=s={side}x{side}:mode=lissajous:rate={fps}")
        }
        VisualizerStyle::Wave => {
            format!("showwaves=s={width}x{height}:mode=cline:colors={colors}:rate={fps}")
        }
        VisualizerStyle::Line => {
            format!("showwaves=s={width}x{height}:mode=line:colors={colors}:rate={fps}")
        }
        VisualizerStyle::P2p => {
            format!("showwaves=s={width}x{height}:mode=p2p:colors={colors}:rate={fps}")
        }
        VisualizerStyle::Bars => {
            format!("showfreqs=s={width}x{height}:mode=bar:colors={colors}")
        }
        VisualizerStyle::Spectrum => {
            format!("showspectrum=s={width}x{height}:mode=combined:slide=scroll")
        }
    }
}

/// Overlay position expressions for the visualizer
pub(crate) fn visualizer_position(config: &VisualizerConfig) -> (String, String) {
    let x = match config.horizontal_position {
        HorizontalPosition::Left => config.margin_side.to_string(),
        HorizontalPosition::Center => "(W-w)/2".to_string(),
        HorizontalPosition::Right => format!("W-w-{}", config.margin_side),
    };
    let y = match config.position {
        VerticalPosition::Top => config.margin_bottom.to_string(),
        VerticalPosition::Center => "(H-h)/2".to_string(),
        VerticalPosition::Bottom => format!("H-h-{}", config.margin_bottom),
    };
    (x, y)
}

/// Build the full video filter for a compose run
pub(crate) fn build_compose_graph(
    video: &VideoConfig,
    visualizer: &VisualizerConfig,
) -> Result<ComposeGraph> {
    let background = build_background_filter(video)?;
    if !visualizer.enabled {
        return Ok(ComposeGraph::Plain(background));
    }

    let source = build_visualizer_source(visualizer, video.fps);
    let (x, y) = visualizer_position(visualizer);
    Ok(ComposeGraph::WithVisualizer(format!(
        "[0:v]{background}[bg];[1:a]{source}[viz];[bg][viz]overlay=x={x}:y={y}[vout]"
    )))
}

/// Build the `drawtext` filter for the thumbnail overlay
pub(crate) fn build_drawtext(config: &OverlayConfig, text: &str, frame_width: u32) -> String {
    let size = fitted_font_size(text.chars().count(), config.font_size, frame_width);

    let mut parts = Vec::new();
    match &config.font_file {
        Some(path) => parts.push(format!("fontfile={}", path.display())),
        None => parts.push(format!("font={}", config.font)),
    }
    parts.push(format!("text={}", escape_drawtext(text)));
    parts.push(format!("fontsize={size}"));
    parts.push(format!("fontcolor={}", config.font_color));
    parts.push("x=(w-text_w)/2".to_string());
    parts.push("y=(h-text_h)/2".to_string());
    if config.border_width > 0 {
        parts.push(format!("borderw={}", config.border_width));
        parts.push(format!("bordercolor={}", config.border_color));
    }
    if config.shadow {
        parts.push(format!("shadowx={}", config.shadow_offset));
        parts.push(format!("shadowy={}", config.shadow_offset));
        parts.push(format!("shadowcolor={}", config.shadow_color));
    }

    format!("drawtext={}", parts.join(":"))
}

/// Shrink the font size until the text fits inside an 8% frame margin
///
/// drawtext cannot measure text up front, so this estimates width at 0.62
/// em per glyph, which is close for the heavy display fonts the overlay
/// targets. Never goes below 40px.
pub(crate) fn fitted_font_size(text_len: usize, base_size: u32, frame_width: u32) -> u32 {
    const MIN_SIZE: u32 = 40;
    const GLYPH_WIDTH_EM: f64 = 0.62;
    const USABLE_WIDTH: f64 = 0.84;

    if text_len == 0 {
        return base_size;
    }
    let max_width = f64::from(frame_width) * USABLE_WIDTH;
    let fitting = (max_width / (text_len as f64 * GLYPH_WIDTH_EM)) as u32;
    fitting.clamp(MIN_SIZE, base_size.max(MIN_SIZE))
}

/// Escape a string for use as a `drawtext` text value
pub(crate) fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
        .replace(',', "\\,")
}
