//! Wire types for the generation API
//!
//! Every endpoint wraps its payload in a `{code, msg, data}` envelope;
//! `code == 200` is the success signal regardless of HTTP status.

use crate::types::{TaskId, TaskStatus};
use serde::{Deserialize, Serialize};

/// Submission payload for `POST /generate`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeneratePayload<'a> {
    pub model: &'a str,
    pub custom_mode: bool,
    pub instrumental: bool,
    // The API spells this with a capital B
    #[serde(rename = "callBackUrl")]
    pub callback_url: &'a str,
    pub prompt: &'a str,
    pub style: &'a str,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_tags: Option<&'a str>,
}

/// Response envelope shared by all generation endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub(crate) fn is_success(&self) -> bool {
        self.code == 200
    }
}

/// `data` payload of a submit response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitData {
    pub task_id: Option<String>,
}

/// `data` payload of a status response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusData {
    pub status: Option<TaskStatus>,
    pub error_message: Option<String>,
    pub response: Option<TrackPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackPayload {
    #[serde(default)]
    pub suno_data: Vec<RemoteTrack>,
}

/// One generated track as reported by the status endpoint
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTrack {
    /// Remote track identifier
    pub id: String,
    /// Direct download URL for the finished audio
    pub audio_url: String,
    /// Streaming URL, available before the download URL in some cases
    #[serde(default)]
    pub stream_audio_url: Option<String>,
    /// Generated cover image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Title the generator settled on
    pub title: String,
    /// Style tags the generator applied
    #[serde(default)]
    pub tags: Option<String>,
    /// Track length in seconds
    pub duration: f64,
}

/// Digested view of one status poll
///
/// Absent or unrecognized statuses digest to [`TaskStatus::Unknown`], which
/// the poller treats as "still working".
#[derive(Clone, Debug)]
pub struct TaskSnapshot {
    /// Task state at poll time
    pub status: TaskStatus,
    /// Remote error message, present on some failures
    pub error_message: Option<String>,
    /// Generated tracks; populated once the task completes
    pub tracks: Vec<RemoteTrack>,
}

impl ApiEnvelope<StatusData> {
    pub(crate) fn into_snapshot(self) -> TaskSnapshot {
        match self.data {
            Some(data) => TaskSnapshot {
                status: data.status.unwrap_or(TaskStatus::Unknown),
                error_message: data.error_message,
                tracks: data
                    .response
                    .map(|payload| payload.suno_data)
                    .unwrap_or_default(),
            },
            None => TaskSnapshot {
                status: TaskStatus::Unknown,
                error_message: None,
                tracks: Vec::new(),
            },
        }
    }
}

/// Extract the task id from a submit envelope, rejecting empty strings
pub(crate) fn extract_task_id(data: Option<SubmitData>) -> Option<TaskId> {
    data.and_then(|data| data.task_id)
        .filter(|id| !id.is_empty())
        .map(TaskId::from)
}
