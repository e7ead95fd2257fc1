//! Core types for mixforge
//!
//! Defines the request/response records flowing through the generation core,
//! the pipeline event enum broadcast to subscribers, and the per-run manifest
//! written next to every finished mix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Opaque identifier for one remote generation task
///
/// Returned by the generation API on submission and used for all subsequent
/// status polls. The value is meaningful only to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// View the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote task status as reported by the generation API
///
/// Wire values are SCREAMING_SNAKE_CASE strings. Statuses the API introduces
/// later deserialize to [`TaskStatus::Unknown`], which is treated as
/// non-terminal so polling continues until the time budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task accepted, nothing generated yet
    Pending,
    /// Lyrics/text stage finished, audio still rendering
    TextSuccess,
    /// First of the paired tracks is ready
    FirstSuccess,
    /// All tracks rendered; terminal success
    Success,
    /// Task creation was rejected; terminal failure
    CreateTaskFailed,
    /// Audio rendering failed; terminal failure
    GenerateAudioFailed,
    /// Provider-side callback delivery failed; terminal failure
    CallbackException,
    /// Prompt tripped the provider's content filter; terminal failure
    SensitiveWordError,
    /// Status string this client does not recognize
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// True when the task reached terminal success
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Success)
    }

    /// True when the task ended in a named failure state
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            TaskStatus::CreateTaskFailed
                | TaskStatus::GenerateAudioFailed
                | TaskStatus::CallbackException
                | TaskStatus::SensitiveWordError
        )
    }

    /// True when the task is still in flight (pending or partial success)
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            TaskStatus::Pending | TaskStatus::TextSuccess | TaskStatus::FirstSuccess
        )
    }

    /// The wire-format name for this status
    pub fn wire_name(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::TextSuccess => "TEXT_SUCCESS",
            TaskStatus::FirstSuccess => "FIRST_SUCCESS",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::CreateTaskFailed => "CREATE_TASK_FAILED",
            TaskStatus::GenerateAudioFailed => "GENERATE_AUDIO_FAILED",
            TaskStatus::CallbackException => "CALLBACK_EXCEPTION",
            TaskStatus::SensitiveWordError => "SENSITIVE_WORD_ERROR",
            TaskStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// One track generation request
///
/// Immutable once submitted; each request maps to exactly one remote task and,
/// on success, exactly one [`TrackResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRequest {
    /// Free-text generation prompt
    pub prompt: String,
    /// Style tags passed to the model (e.g. "dark synthwave, analog")
    pub style: String,
    /// Track title, also used in error reporting
    pub title: String,
    /// Styles the model should avoid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_tags: Option<String>,
}

/// One finished track, produced when its task reaches terminal success
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackResult {
    /// The remote task that produced this track
    pub task_id: TaskId,
    /// Track title as reported by the API
    pub title: String,
    /// Remote URL of the rendered audio file
    pub audio_url: String,
    /// Track length in seconds
    pub duration: f64,
    /// Remote URL of the generated cover image, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Parameters for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixParams {
    /// Mood word woven into prompts and metadata (e.g. "focus")
    pub mood: String,
    /// Genre preset key (see [`crate::presets`])
    pub genre: String,
    /// Number of tracks to generate for the mix
    pub track_count: usize,
}

impl Default for MixParams {
    fn default() -> Self {
        Self {
            mood: "FOCUS".to_string(),
            genre: "dark_synthwave".to_string(),
            track_count: 10,
        }
    }
}

/// Title and length of one track inside a finished mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    /// Track title
    pub title: String,
    /// Track length in seconds
    pub duration: f64,
}

/// Per-run manifest written next to the finished mix
///
/// Captures everything needed to publish the video later: platform metadata,
/// the tracklist, and (after publishing) the remote video identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixManifest {
    /// Video title
    pub title: String,
    /// Video description including the timestamped tracklist
    pub description: String,
    /// Platform tags
    pub tags: Vec<String>,
    /// Hashtags included at the end of the description
    pub hashtags: Vec<String>,
    /// Mood the mix was generated with
    pub mood: String,
    /// Genre preset key
    pub genre: String,
    /// Genre display name
    pub genre_name: String,
    /// Preset tempo, for reference
    pub bpm: u32,
    /// Number of tracks in the mix
    pub track_count: usize,
    /// Total mix length in seconds
    pub total_duration_secs: f64,
    /// Ordered tracklist
    pub tracks: Vec<TrackSummary>,
    /// When the mix was generated
    pub generated_at: DateTime<Utc>,
    /// Remote video ID, set after publishing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_id: Option<String>,
    /// Remote video URL, set after publishing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    /// When the video was published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

/// Paths and totals for one finished pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixOutput {
    /// Per-run directory holding every artifact
    pub run_dir: PathBuf,
    /// Final mixed audio file
    pub audio_path: PathBuf,
    /// Final rendered video file
    pub video_path: PathBuf,
    /// Final thumbnail (with title overlay)
    pub thumbnail_path: PathBuf,
    /// Manifest JSON path
    pub manifest_path: PathBuf,
    /// Total mix length in seconds
    pub total_duration_secs: f64,
}

/// Receipt returned after a successful publish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Remote video ID
    pub video_id: String,
    /// Watch URL for the uploaded video
    pub url: String,
    /// Upload completion time
    pub published_at: DateTime<Utc>,
}

/// Visibility of a published video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    /// Visible only to the channel owner (default)
    #[default]
    Private,
    /// Reachable by link, not listed
    Unlisted,
    /// Publicly listed
    Public,
}

impl fmt::Display for PrivacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrivacyStatus::Private => "private",
            PrivacyStatus::Unlisted => "unlisted",
            PrivacyStatus::Public => "public",
        };
        write!(f, "{s}")
    }
}

/// Pipeline phase, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Track title generation
    Titles,
    /// Parallel track generation against the remote API
    Generation,
    /// Thumbnail sourcing (runs alongside generation)
    Artwork,
    /// Parallel audio downloads
    Download,
    /// Mixing into one audio stream
    Mix,
    /// Warmth mastering pass
    Master,
    /// Overlay render and video encode
    Compose,
    /// Platform metadata and manifest write
    Metadata,
    /// Upload to the video platform
    Publish,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Titles => "titles",
            Phase::Generation => "generation",
            Phase::Artwork => "artwork",
            Phase::Download => "download",
            Phase::Mix => "mix",
            Phase::Master => "master",
            Phase::Compose => "compose",
            Phase::Metadata => "metadata",
            Phase::Publish => "publish",
        };
        write!(f, "{s}")
    }
}

/// Events emitted by the pipeline
///
/// Subscribe via [`crate::pipeline::MixPipeline::subscribe`]. Events are
/// broadcast best-effort; lagging receivers miss events rather than slowing
/// the pipeline down.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A pipeline run began
    PipelineStarted {
        /// Mood for this run
        mood: String,
        /// Genre preset key for this run
        genre: String,
        /// Number of tracks requested
        track_count: usize,
    },

    /// A phase began
    PhaseStarted {
        /// The phase that began
        phase: Phase,
    },

    /// A phase finished successfully
    PhaseCompleted {
        /// The phase that finished
        phase: Phase,
    },

    /// One poll tick observed a task status
    TrackStatus {
        /// Remote task ID
        task_id: TaskId,
        /// Request title
        title: String,
        /// Status observed on this poll
        status: TaskStatus,
    },

    /// One track reached terminal success
    TrackCompleted {
        /// Remote task ID
        task_id: TaskId,
        /// Track title
        title: String,
        /// Track length in seconds
        duration: f64,
    },

    /// All track audio files finished downloading
    TracksDownloaded {
        /// Number of files written
        count: usize,
    },

    /// The mixed audio file was rendered
    MixRendered {
        /// Path of the mixed audio file
        path: PathBuf,
        /// Total mix length in seconds
        duration_secs: f64,
    },

    /// The thumbnail was sourced
    ThumbnailReady {
        /// Path of the thumbnail image
        path: PathBuf,
    },

    /// The video file was encoded
    VideoRendered {
        /// Path of the rendered video
        path: PathBuf,
    },

    /// The run manifest was written
    ManifestWritten {
        /// Path of the manifest JSON
        path: PathBuf,
    },

    /// The run finished; all artifacts are in place
    PipelineCompleted {
        /// Per-run directory
        run_dir: PathBuf,
        /// Final video path
        video_path: PathBuf,
    },

    /// An upload began
    PublishStarted {
        /// Video title being uploaded
        title: String,
    },

    /// An upload finished
    PublishCompleted {
        /// Remote video ID
        video_id: String,
        /// Watch URL
        url: String,
    },
}
