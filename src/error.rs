//! Error types for mixforge
//!
//! This module provides comprehensive error handling for the library, including:
//! - Domain-specific error types (Generation, Download, Audio, Compose, etc.)
//! - Contextual information (request index, track title, task ID, tool stderr)
//! - A crate-wide `Result` alias used by every fallible operation

use crate::types::{TaskId, TaskStatus};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mixforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mixforge
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "suno.api_key")
        key: Option<String>,
    },

    /// Track generation error (submit, poll, fan-out)
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Audio download error
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Audio mixing or mastering error
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),

    /// Video composition error
    #[error("compose error: {0}")]
    Compose(#[from] ComposeError),

    /// Thumbnail sourcing error
    #[error("thumbnail error: {0}")]
    Thumbnail(#[from] ThumbnailError),

    /// Generative text/image API error
    #[error("generative API error: {0}")]
    Generative(#[from] GenerativeError),

    /// Video publishing error
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Required external tool is not installed or not on PATH
    #[error("{tool} not found: install it or set an explicit path in the config")]
    ToolNotFound {
        /// Name of the missing binary (e.g., "ffmpeg")
        tool: String,
    },

    /// External tool execution failed (ffmpeg, ffprobe)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Referenced file or run directory does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Track generation errors (the submit/poll/fan-out core)
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Generation API responded with a non-success HTTP status
    #[error("generation API returned HTTP {status}")]
    Http {
        /// The HTTP status code returned by the API
        status: u16,
    },

    /// Generation API envelope carried a non-success application code
    #[error("generation API error (code {code}): {message}")]
    Api {
        /// Application-level code from the response envelope
        code: i64,
        /// Message from the response envelope
        message: String,
    },

    /// Submission response did not contain a task identifier
    #[error("generation API response missing taskId")]
    MissingTaskId,

    /// Remote task ended in a named failure status
    #[error("track generation failed for '{title}' ({status}): {message}")]
    TaskFailed {
        /// Title of the failed track
        title: String,
        /// The terminal failure status reported by the API
        status: TaskStatus,
        /// Remote error message, or a generic placeholder when absent
        message: String,
    },

    /// Task reached success but the result payload contained no tracks
    #[error("no tracks in completed response for task {task_id}")]
    EmptyResult {
        /// The task whose success payload was empty
        task_id: TaskId,
    },

    /// Polling exceeded the configured time budget
    #[error("timeout waiting for track '{title}' after {waited_secs}s")]
    Timeout {
        /// Title of the track that never finished
        title: String,
        /// Seconds waited before giving up
        waited_secs: u64,
    },

    /// A fan-out batch failed; carries the first failure by request order
    #[error("track generation failed for request {index} ('{title}'): {source}")]
    Batch {
        /// 1-based index of the failed request in submission order
        index: usize,
        /// Title of the failed request
        title: String,
        /// The underlying failure
        source: Box<Error>,
    },
}

/// Audio download errors
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Remote host answered with a non-success HTTP status
    #[error("download failed for {url}: HTTP {status}")]
    Http {
        /// The URL that failed to download
        url: String,
        /// The HTTP status code received
        status: u16,
    },

    /// Explicit filename list does not match the URL count
    #[error("expected {expected} filenames, got {actual}")]
    FilenameCount {
        /// Number of URLs to download
        expected: usize,
        /// Number of filenames supplied
        actual: usize,
    },

    /// A parallel download batch failed; carries the first failure in order
    #[error("download failed for track {index}: {source}")]
    Batch {
        /// 1-based index of the failed download in input order
        index: usize,
        /// The underlying failure
        source: Box<Error>,
    },
}

/// Audio mixing and mastering errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// Mix requested with an empty input list
    #[error("no input tracks to mix")]
    NoInputs,

    /// ffmpeg exited non-zero while rendering the mix
    #[error("ffmpeg mix failed: {stderr}")]
    MixFailed {
        /// Captured stderr from the encoder
        stderr: String,
    },

    /// ffmpeg exited non-zero while applying the warmth chain
    #[error("warmth pass failed: {stderr}")]
    WarmthFailed {
        /// Captured stderr from the encoder
        stderr: String,
    },

    /// ffprobe could not report a duration for the file
    #[error("failed to probe duration of {path}: {detail}")]
    ProbeFailed {
        /// File that was probed
        path: PathBuf,
        /// Tool output or parse failure detail
        detail: String,
    },
}

/// Video composition errors
#[derive(Debug, Error)]
pub enum ComposeError {
    /// drawtext overlay render exited non-zero
    #[error("thumbnail overlay render failed: {stderr}")]
    OverlayFailed {
        /// Captured stderr from the encoder
        stderr: String,
    },

    /// Video encode exited non-zero
    #[error("video encode failed: {stderr}")]
    EncodeFailed {
        /// Captured stderr from the encoder
        stderr: String,
    },
}

/// Thumbnail sourcing errors
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// Neither local assets nor a generative API are available
    #[error("no thumbnail assets found and no generative API configured")]
    NoSource,

    /// Asset directory exists but a chosen asset could not be read
    #[error("failed to use thumbnail asset {path}: {detail}")]
    AssetUnusable {
        /// The asset that could not be used
        path: PathBuf,
        /// Underlying failure detail
        detail: String,
    },
}

/// Generative text/image API errors
#[derive(Debug, Error)]
pub enum GenerativeError {
    /// API responded with a non-success HTTP status
    #[error("generative API returned HTTP {status}: {detail}")]
    Api {
        /// The HTTP status code returned
        status: u16,
        /// Response body excerpt for diagnosis
        detail: String,
    },

    /// Response contained no usable text candidates
    #[error("generative API response contained no text")]
    NoText,

    /// Response contained no inline image payload
    #[error("generative API response contained no image data")]
    NoImage,

    /// Inline image payload was not valid base64
    #[error("failed to decode inline image payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Video publishing errors
#[derive(Debug, Error)]
pub enum PublishError {
    /// OAuth client secrets file is missing or unreadable
    #[error("client secrets not found at {path}")]
    MissingSecrets {
        /// Expected location of the client secrets JSON
        path: PathBuf,
    },

    /// Stored token lacks a refresh token; the one-time consent flow was never run
    #[error("no refresh token stored: complete the OAuth consent flow once and save the token file")]
    MissingRefreshToken,

    /// OAuth token endpoint rejected the refresh request
    #[error("token refresh failed with HTTP {status}: {detail}")]
    TokenRefreshFailed {
        /// The HTTP status code returned by the token endpoint
        status: u16,
        /// Response body excerpt for diagnosis
        detail: String,
    },

    /// Resumable upload initiation did not yield a session URL
    #[error("upload session init failed with HTTP {status}: {detail}")]
    UploadInitFailed {
        /// The HTTP status code returned
        status: u16,
        /// Response body excerpt for diagnosis
        detail: String,
    },

    /// Video byte upload failed
    #[error("video upload failed with HTTP {status}: {detail}")]
    UploadFailed {
        /// The HTTP status code returned
        status: u16,
        /// Response body excerpt for diagnosis
        detail: String,
    },
}
