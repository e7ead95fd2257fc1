//! Track generation against the remote music API
//!
//! Three layers, bottom up:
//!
//! - [`SunoClient::submit`] / [`SunoClient::poll`] — single HTTP calls, no
//!   retries; a failed call propagates immediately.
//! - [`SunoClient::wait_for_track`] — fixed-interval polling loop per task,
//!   bounded by the configured timeout.
//! - [`SunoClient::generate_tracks_parallel`] — bounded fan-out over many
//!   submit+poll sequences with an all-or-nothing fan-in.

use crate::config::SunoConfig;
use crate::error::{Error, GenerationError, Result};
use crate::types::{TaskId, TrackRequest};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

mod executor;
mod poller;
mod wire;

pub use executor::StatusCallback;
pub use wire::{RemoteTrack, TaskSnapshot};

use wire::{ApiEnvelope, GeneratePayload, StatusData, SubmitData};

/// Async client for the generation API
///
/// Cheap to clone is not needed; one client is shared by reference and its
/// connection pool serves all concurrent sequences.
#[derive(Debug)]
pub struct SunoClient {
    config: SunoConfig,
    http: reqwest::Client,
    base_url: String,
}

impl SunoClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the API key cannot form a valid
    /// authorization header, or [`Error::Network`] when the HTTP client
    /// cannot be built.
    pub fn new(config: SunoConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(
            |_| Error::Config {
                message: "API key contains characters invalid in a header".to_string(),
                key: Some("suno.api_key".to_string()),
            },
        )?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            config,
            http,
            base_url,
        })
    }

    /// Configured poll interval and timeout, used by the polling loop
    pub(crate) fn config(&self) -> &SunoConfig {
        &self.config
    }

    /// Submit one track generation request
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Api`] when the envelope code is not 200,
    /// [`GenerationError::MissingTaskId`] when a success envelope carries no
    /// usable task id, and [`GenerationError::Http`] when a non-success HTTP
    /// response has no parseable envelope.
    pub async fn submit(&self, request: &TrackRequest) -> Result<TaskId> {
        let payload = GeneratePayload {
            model: &self.config.model,
            custom_mode: self.config.custom_mode,
            instrumental: self.config.instrumental,
            callback_url: &self.config.callback_url,
            prompt: &request.prompt,
            style: &request.style,
            title: &request.title,
            negative_tags: request
                .negative_tags
                .as_deref()
                .filter(|tags| !tags.is_empty()),
        };

        debug!(title = %request.title, "submitting track generation");

        let response = self
            .http
            .post(format!("{}/generate", self.base_url))
            .json(&payload)
            .send()
            .await?;

        let envelope: ApiEnvelope<SubmitData> = read_envelope(response).await?;
        if !envelope.is_success() {
            return Err(GenerationError::Api {
                code: envelope.code,
                message: envelope.msg,
            }
            .into());
        }

        let task_id =
            wire::extract_task_id(envelope.data).ok_or(GenerationError::MissingTaskId)?;

        info!(title = %request.title, task_id = %task_id, "track submitted");
        Ok(task_id)
    }

    /// Query the status of one task
    ///
    /// The envelope code is not consulted here: an error envelope digests to
    /// an [`crate::types::TaskStatus::Unknown`] snapshot and the polling loop
    /// keeps going until its timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] on transport failure and
    /// [`GenerationError::Http`] or [`Error::Serialization`] on malformed
    /// responses.
    pub async fn poll(&self, task_id: &TaskId) -> Result<TaskSnapshot> {
        let response = self
            .http
            .get(format!("{}/generate/record-info", self.base_url))
            .query(&[("taskId", task_id.as_str())])
            .send()
            .await?;

        let envelope: ApiEnvelope<StatusData> = read_envelope(response).await?;
        Ok(envelope.into_snapshot())
    }
}

// Parses the envelope regardless of HTTP status — the API mirrors errors
// into the envelope code. A non-2xx response without a parseable envelope
// (e.g. a proxy error page) surfaces as an HTTP error instead.
async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<ApiEnvelope<T>> {
    let status = response.status();
    let bytes = response.bytes().await?;

    match serde_json::from_slice(&bytes) {
        Ok(envelope) => Ok(envelope),
        Err(err) => {
            if status.is_success() {
                Err(err.into())
            } else {
                Err(GenerationError::Http {
                    status: status.as_u16(),
                }
                .into())
            }
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
