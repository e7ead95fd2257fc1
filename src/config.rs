//! Configuration types for mixforge

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Main configuration container
///
/// Every section has sensible defaults; only `suno.api_key` must be provided
/// (directly, via `.env`, or via the `SUNO_API_KEY` environment variable).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generation API settings
    #[serde(default)]
    pub suno: SunoConfig,

    /// Audio mixing settings
    #[serde(default)]
    pub mixer: MixerConfig,

    /// Warmth mastering settings
    #[serde(default)]
    pub warmth: WarmthConfig,

    /// Video encoding settings
    #[serde(default)]
    pub video: VideoConfig,

    /// Thumbnail text overlay settings
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Audio visualizer settings
    #[serde(default)]
    pub visualizer: VisualizerConfig,

    /// Generative text/image API settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Thumbnail sourcing settings
    #[serde(default)]
    pub thumbnail: ThumbnailConfig,

    /// Platform metadata settings
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Video publishing settings
    #[serde(default)]
    pub youtube: YouTubeConfig,

    /// Pipeline directory and cleanup settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// External tool locations
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    /// Load configuration from `.env` and environment variables
    ///
    /// Starts from defaults, loads a `.env` file from the working directory
    /// when present, then applies `SUNO_*`, `GEMINI_API_KEY`,
    /// `YOUTUBE_CLIENT_SECRETS_PATH` and `MIXFORGE_OUTPUT_DIR` overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a numeric override fails to parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        Self::apply_env(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(config: &mut Self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = get("SUNO_API_KEY") {
            config.suno.api_key = key;
        }
        if let Some(url) = get("SUNO_BASE_URL") {
            config.suno.base_url = url;
        }
        if let Some(url) = get("SUNO_CALLBACK_URL") {
            config.suno.callback_url = url;
        }
        if let Some(model) = get("SUNO_MODEL") {
            config.suno.model = model;
        }
        if let Some(secs) = get("SUNO_POLL_INTERVAL_SECONDS") {
            config.suno.poll_interval = Duration::from_secs(parse_env_u64(
                "SUNO_POLL_INTERVAL_SECONDS",
                &secs,
            )?);
        }
        if let Some(secs) = get("SUNO_TIMEOUT_SECONDS") {
            config.suno.timeout =
                Duration::from_secs(parse_env_u64("SUNO_TIMEOUT_SECONDS", &secs)?);
        }
        if let Some(count) = get("SUNO_MAX_CONCURRENT") {
            config.suno.max_concurrent =
                parse_env_u64("SUNO_MAX_CONCURRENT", &count)? as usize;
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            config.gemini.api_key = key;
        }
        if let Some(path) = get("YOUTUBE_CLIENT_SECRETS_PATH") {
            config.youtube.client_secrets_path = PathBuf::from(path);
        }
        if let Some(dir) = get("MIXFORGE_OUTPUT_DIR") {
            config.pipeline.output_directory = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending key when a setting is
    /// missing or out of range.
    pub fn validate(&self) -> Result<()> {
        if self.suno.api_key.is_empty() {
            return Err(Error::Config {
                message: "generation API key is required".to_string(),
                key: Some("suno.api_key".to_string()),
            });
        }

        if self.suno.max_concurrent == 0 {
            return Err(Error::Config {
                message: "max_concurrent must be at least 1".to_string(),
                key: Some("suno.max_concurrent".to_string()),
            });
        }

        if self.suno.poll_interval.is_zero() {
            return Err(Error::Config {
                message: "poll_interval must be non-zero".to_string(),
                key: Some("suno.poll_interval".to_string()),
            });
        }

        if self.mixer.transition == Transition::Crossfade && self.mixer.crossfade_duration_ms == 0
        {
            return Err(Error::Config {
                message: "crossfade transitions need a non-zero duration".to_string(),
                key: Some("mixer.crossfade_duration_ms".to_string()),
            });
        }

        if !(0.0..=1.0).contains(&self.visualizer.opacity) {
            return Err(Error::Config {
                message: "visualizer opacity must be between 0.0 and 1.0".to_string(),
                key: Some("visualizer.opacity".to_string()),
            });
        }

        if self.video.crf > 51 {
            return Err(Error::Config {
                message: "crf must be between 0 and 51".to_string(),
                key: Some("video.crf".to_string()),
            });
        }

        if self.pipeline.download_concurrency == 0 {
            return Err(Error::Config {
                message: "download_concurrency must be at least 1".to_string(),
                key: Some("pipeline.download_concurrency".to_string()),
            });
        }

        Ok(())
    }
}

fn parse_env_u64(key: &str, raw: &str) -> Result<u64> {
    raw.parse().map_err(|_| Error::Config {
        message: format!("invalid value '{raw}' (expected an integer)"),
        key: Some(key.to_string()),
    })
}

/// Generation API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SunoConfig {
    /// API key (bearer token); usually supplied via `SUNO_API_KEY`
    #[serde(default)]
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_suno_base_url")]
    pub base_url: String,

    /// Callback URL the API requires on submission (results are polled, not
    /// pushed, so any reachable URL satisfies it)
    #[serde(default = "default_callback_url")]
    pub callback_url: String,

    /// Model name (e.g. "V5")
    #[serde(default = "default_model")]
    pub model: String,

    /// Submit prompts in custom mode (explicit style/title fields)
    #[serde(default = "default_true")]
    pub custom_mode: bool,

    /// Request instrumental tracks (no vocals)
    #[serde(default = "default_true")]
    pub instrumental: bool,

    /// Delay between status polls (default: 30s)
    #[serde(default = "default_poll_interval", with = "duration_serde")]
    pub poll_interval: Duration,

    /// Total time budget per task before giving up (default: 600s)
    #[serde(default = "default_generation_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// Maximum submit+poll sequences in flight at once (default: 10)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for SunoConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_suno_base_url(),
            callback_url: default_callback_url(),
            model: default_model(),
            custom_mode: true,
            instrumental: true,
            poll_interval: default_poll_interval(),
            timeout: default_generation_timeout(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Transition between tracks in the mix
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Clean cut, tracks back to back (default)
    #[default]
    Cut,
    /// Overlapping crossfade of `crossfade_duration_ms`
    Crossfade,
}

/// Audio mixing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MixerConfig {
    /// How consecutive tracks are joined
    #[serde(default)]
    pub transition: Transition,

    /// Crossfade length in milliseconds (used when transition is crossfade)
    #[serde(default = "default_crossfade_ms")]
    pub crossfade_duration_ms: u64,

    /// Loudness target each track is normalized to before joining
    #[serde(default = "default_target_loudness")]
    pub target_loudness_dbfs: f64,

    /// Output container/format (default: "mp3")
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Output bitrate (default: "320k")
    #[serde(default = "default_output_bitrate")]
    pub output_bitrate: String,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            transition: Transition::default(),
            crossfade_duration_ms: default_crossfade_ms(),
            target_loudness_dbfs: default_target_loudness(),
            output_format: default_output_format(),
            output_bitrate: default_output_bitrate(),
        }
    }
}

/// Warmth mastering configuration
///
/// A subtle tape-flavored chain applied to the finished mix: low shelf boost,
/// high shelf roll-off, gentle lowpass, slow chorus drift, a touch of room
/// echo, slow compression, and makeup gain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WarmthConfig {
    /// Apply the warmth pass to the mixed audio (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Low shelf boost in dB
    #[serde(default = "default_low_shelf_gain")]
    pub low_shelf_gain_db: f64,

    /// Low shelf corner frequency in Hz
    #[serde(default = "default_low_shelf_freq")]
    pub low_shelf_freq_hz: f64,

    /// High shelf adjustment in dB (negative rolls off highs)
    #[serde(default = "default_high_shelf_gain")]
    pub high_shelf_gain_db: f64,

    /// High shelf corner frequency in Hz
    #[serde(default = "default_high_shelf_freq")]
    pub high_shelf_freq_hz: f64,

    /// Lowpass cutoff taming digital edge, in Hz
    #[serde(default = "default_lowpass_freq")]
    pub lowpass_freq_hz: f64,

    /// Chorus modulation rate in Hz (slow for tape-like drift)
    #[serde(default = "default_chorus_rate")]
    pub chorus_rate_hz: f64,

    /// Chorus depth, 0.0 to 1.0
    #[serde(default = "default_chorus_depth")]
    pub chorus_depth: f64,

    /// Chorus wet/dry mix, 0.0 to 1.0
    #[serde(default = "default_chorus_mix")]
    pub chorus_mix: f64,

    /// Room echo delay in milliseconds
    #[serde(default = "default_echo_delay")]
    pub echo_delay_ms: f64,

    /// Room echo decay, 0.0 to 1.0 (kept low for subtlety)
    #[serde(default = "default_echo_decay")]
    pub echo_decay: f64,

    /// Compressor threshold in dB
    #[serde(default = "default_compressor_threshold")]
    pub compressor_threshold_db: f64,

    /// Compressor ratio
    #[serde(default = "default_compressor_ratio")]
    pub compressor_ratio: f64,

    /// Final makeup gain in dB
    #[serde(default = "default_makeup_gain")]
    pub makeup_gain_db: f64,
}

impl Default for WarmthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            low_shelf_gain_db: default_low_shelf_gain(),
            low_shelf_freq_hz: default_low_shelf_freq(),
            high_shelf_gain_db: default_high_shelf_gain(),
            high_shelf_freq_hz: default_high_shelf_freq(),
            lowpass_freq_hz: default_lowpass_freq(),
            chorus_rate_hz: default_chorus_rate(),
            chorus_depth: default_chorus_depth(),
            chorus_mix: default_chorus_mix(),
            echo_delay_ms: default_echo_delay(),
            echo_decay: default_echo_decay(),
            compressor_threshold_db: default_compressor_threshold(),
            compressor_ratio: default_compressor_ratio(),
            makeup_gain_db: default_makeup_gain(),
        }
    }
}

/// Video encoding configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Output resolution (default: "1920x1080")
    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// Output frame rate (default: 30)
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Video codec (default: "libx264")
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Encoder preset (default: "medium")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Constant rate factor, 0-51 (default: 18)
    #[serde(default = "default_crf")]
    pub crf: u32,

    /// Audio codec (default: "aac")
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate (default: "320k")
    #[serde(default = "default_output_bitrate")]
    pub audio_bitrate: String,

    /// Fade-in from black at the start, in seconds (default: 2.0)
    #[serde(default = "default_fade_in")]
    pub fade_in_secs: f64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            fps: default_fps(),
            codec: default_codec(),
            preset: default_preset(),
            crf: default_crf(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_output_bitrate(),
            fade_in_secs: default_fade_in(),
        }
    }
}

/// Thumbnail text overlay configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Render the mood word onto the thumbnail (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Font family name, resolved through fontconfig
    #[serde(default = "default_font")]
    pub font: String,

    /// Explicit font file; takes precedence over the family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_file: Option<PathBuf>,

    /// Font size in pixels (default: 140)
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Text color (default: "white")
    #[serde(default = "default_font_color")]
    pub font_color: String,

    /// Draw a drop shadow behind the text (default: true)
    #[serde(default = "default_true")]
    pub shadow: bool,

    /// Shadow color (default: "black")
    #[serde(default = "default_shadow_color")]
    pub shadow_color: String,

    /// Shadow offset in pixels (default: 4)
    #[serde(default = "default_shadow_offset")]
    pub shadow_offset: i32,

    /// Outline width in pixels lifting the text off busy art (default: 3)
    #[serde(default = "default_border_width")]
    pub border_width: u32,

    /// Outline color (default: "black")
    #[serde(default = "default_shadow_color")]
    pub border_color: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            font: default_font(),
            font_file: None,
            font_size: default_font_size(),
            font_color: default_font_color(),
            shadow: true,
            shadow_color: default_shadow_color(),
            shadow_offset: default_shadow_offset(),
            border_width: default_border_width(),
            border_color: default_shadow_color(),
        }
    }
}

/// Audio visualizer style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizerStyle {
    /// Phase scope (square aspect; width setting is ignored)
    Lissajous,
    /// Filled waveform
    Wave,
    /// Single-line waveform
    Line,
    /// Scrolling spectrum
    Spectrum,
    /// Frequency bars
    Bars,
    /// Point-to-point waveform (default)
    #[default]
    P2p,
}

/// Vertical placement of the visualizer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalPosition {
    /// Along the top edge
    Top,
    /// Vertically centered
    Center,
    /// Along the bottom edge (default)
    #[default]
    Bottom,
}

/// Horizontal placement of the visualizer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalPosition {
    /// Against the left edge
    Left,
    /// Horizontally centered
    Center,
    /// Against the right edge (default)
    #[default]
    Right,
}

/// Audio visualizer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Overlay a small audio visualizer on the video (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Visualizer style
    #[serde(default)]
    pub style: VisualizerStyle,

    /// Height in pixels; also the side length for lissajous (default: 60)
    #[serde(default = "default_visualizer_height")]
    pub height: u32,

    /// Width in pixels, ignored for lissajous (default: 200)
    #[serde(default = "default_visualizer_width")]
    pub width: u32,

    /// Vertical placement
    #[serde(default)]
    pub position: VerticalPosition,

    /// Horizontal placement
    #[serde(default)]
    pub horizontal_position: HorizontalPosition,

    /// Draw color (default: "white")
    #[serde(default = "default_font_color")]
    pub color: String,

    /// Opacity, 0.0 to 1.0 (default: 0.9)
    #[serde(default = "default_visualizer_opacity")]
    pub opacity: f64,

    /// Pixels between the visualizer and the top/bottom edge (default: 40)
    #[serde(default = "default_margin_bottom")]
    pub margin_bottom: u32,

    /// Pixels between the visualizer and the left/right edge (default: 50)
    #[serde(default = "default_margin_side")]
    pub margin_side: u32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            style: VisualizerStyle::default(),
            height: default_visualizer_height(),
            width: default_visualizer_width(),
            position: VerticalPosition::default(),
            horizontal_position: HorizontalPosition::default(),
            color: default_font_color(),
            opacity: default_visualizer_opacity(),
            margin_bottom: default_margin_bottom(),
            margin_side: default_margin_side(),
        }
    }
}

/// Generative text/image API configuration
///
/// One key serves track titles, video titles, thumbnail prompts, and
/// thumbnail images. An empty key disables the generative paths; every
/// consumer falls back to its word-bank or template equivalent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; usually supplied via `GEMINI_API_KEY`
    #[serde(default)]
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Model used for text generation
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used for image generation
    #[serde(default = "default_image_model")]
    pub image_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_gemini_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
        }
    }
}

/// Thumbnail sourcing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Directory of pre-generated thumbnail images; when it holds at least
    /// one image, a random asset is used instead of the generative API
    #[serde(default = "default_assets_directory")]
    pub assets_directory: PathBuf,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            assets_directory: default_assets_directory(),
        }
    }
}

/// Platform metadata configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Optional line placed at the top of the description (e.g. a newsletter
    /// link)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_lead: Option<String>,

    /// Optional line placed after the tracklist (e.g. a community link)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_outro: Option<String>,

    /// Platform category ID (default: "10", Music)
    #[serde(default = "default_category_id")]
    pub category_id: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            promo_lead: None,
            promo_outro: None,
            category_id: default_category_id(),
        }
    }
}

/// Video publishing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// OAuth installed-app client secrets JSON, as downloaded from the
    /// provider console
    #[serde(default = "default_client_secrets_path")]
    pub client_secrets_path: PathBuf,

    /// Stored OAuth token JSON (must contain a refresh token)
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,

    /// OAuth token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// API/upload base URL
    #[serde(default = "default_youtube_api_base")]
    pub api_base: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            client_secrets_path: default_client_secrets_path(),
            token_path: default_token_path(),
            token_url: default_token_url(),
            api_base: default_youtube_api_base(),
        }
    }
}

/// Pipeline directory and cleanup configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory that receives one subdirectory per run (default: "./output")
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    /// Scratch directory for downloaded tracks (default: "./temp")
    #[serde(default = "default_temp_directory")]
    pub temp_directory: PathBuf,

    /// Remove the per-run scratch directory after a successful run
    #[serde(default = "default_true")]
    pub cleanup_temp: bool,

    /// Maximum parallel track downloads (default: 5)
    #[serde(default = "default_download_concurrency")]
    pub download_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            temp_directory: default_temp_directory(),
            cleanup_temp: true,
            download_concurrency: default_download_concurrency(),
        }
    }
}

/// External tool locations
///
/// Leave unset to discover binaries on PATH.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Explicit path to ffmpeg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,

    /// Explicit path to ffprobe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffprobe_path: Option<PathBuf>,
}

impl ToolsConfig {
    /// Resolve the ffmpeg binary
    ///
    /// Uses the explicit override when set (taken verbatim, not verified),
    /// otherwise searches PATH.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] when no override is set and the binary
    /// is not on PATH.
    pub fn ffmpeg(&self) -> Result<PathBuf> {
        resolve_tool(self.ffmpeg_path.as_deref(), "ffmpeg")
    }

    /// Resolve the ffprobe binary
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] when no override is set and the binary
    /// is not on PATH.
    pub fn ffprobe(&self) -> Result<PathBuf> {
        resolve_tool(self.ffprobe_path.as_deref(), "ffprobe")
    }
}

fn resolve_tool(override_path: Option<&Path>, name: &str) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }
    which::which(name).map_err(|_| Error::ToolNotFound {
        tool: name.to_string(),
    })
}

// Default value functions

fn default_true() -> bool {
    true
}

fn default_suno_base_url() -> String {
    "https://api.sunoapi.org/api/v1".to_string()
}

fn default_callback_url() -> String {
    "https://api.example.com/callback".to_string()
}

fn default_model() -> String {
    "V5".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_generation_timeout() -> Duration {
    Duration::from_secs(600)
}

fn default_max_concurrent() -> usize {
    10
}

fn default_crossfade_ms() -> u64 {
    3000
}

fn default_target_loudness() -> f64 {
    -14.0
}

fn default_output_format() -> String {
    "mp3".to_string()
}

fn default_output_bitrate() -> String {
    "320k".to_string()
}

fn default_low_shelf_gain() -> f64 {
    2.5
}

fn default_low_shelf_freq() -> f64 {
    180.0
}

fn default_high_shelf_gain() -> f64 {
    -2.0
}

fn default_high_shelf_freq() -> f64 {
    7000.0
}

fn default_lowpass_freq() -> f64 {
    14000.0
}

fn default_chorus_rate() -> f64 {
    0.2
}

fn default_chorus_depth() -> f64 {
    0.08
}

fn default_chorus_mix() -> f64 {
    0.12
}

fn default_echo_delay() -> f64 {
    60.0
}

fn default_echo_decay() -> f64 {
    0.08
}

fn default_compressor_threshold() -> f64 {
    -18.0
}

fn default_compressor_ratio() -> f64 {
    2.0
}

fn default_makeup_gain() -> f64 {
    1.0
}

fn default_resolution() -> String {
    "1920x1080".to_string()
}

fn default_fps() -> u32 {
    30
}

fn default_codec() -> String {
    "libx264".to_string()
}

fn default_preset() -> String {
    "medium".to_string()
}

fn default_crf() -> u32 {
    18
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_fade_in() -> f64 {
    2.0
}

fn default_font() -> String {
    "Montserrat-Black".to_string()
}

fn default_font_size() -> u32 {
    140
}

fn default_font_color() -> String {
    "white".to_string()
}

fn default_shadow_color() -> String {
    "black".to_string()
}

fn default_shadow_offset() -> i32 {
    4
}

fn default_border_width() -> u32 {
    3
}

fn default_visualizer_height() -> u32 {
    60
}

fn default_visualizer_width() -> u32 {
    200
}

fn default_visualizer_opacity() -> f64 {
    0.9
}

fn default_margin_bottom() -> u32 {
    40
}

fn default_margin_side() -> u32 {
    50
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-3-pro-image-preview".to_string()
}

fn default_assets_directory() -> PathBuf {
    PathBuf::from("./assets/thumbnails")
}

fn default_category_id() -> String {
    "10".to_string()
}

fn default_client_secrets_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_token_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".mixforge").join("youtube_token.json"),
        None => PathBuf::from(".mixforge").join("youtube_token.json"),
    }
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_youtube_api_base() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./output")
}

fn default_temp_directory() -> PathBuf {
    PathBuf::from("./temp")
}

fn default_download_concurrency() -> usize {
    5
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
