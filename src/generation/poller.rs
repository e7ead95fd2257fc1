//! Fixed-interval polling loop for one generation task

use crate::error::{GenerationError, Result};
use crate::types::{TaskId, TrackRequest, TrackResult};
use std::time::Duration;
use tracing::{debug, info};

use super::{SunoClient, StatusCallback};

impl SunoClient {
    /// Poll one task until it reaches a terminal state or the time budget
    /// runs out
    ///
    /// The loop sleeps the configured interval between polls and counts the
    /// budget in whole intervals, not wall-clock time: each iteration adds
    /// one interval to the elapsed total, so slow polls extend the real
    /// deadline rather than shrinking the number of attempts.
    ///
    /// `on_status` fires once per poll with `(task_id, title, status)`; keep
    /// it cheap, it runs on the polling task. The remote task is not
    /// cancelled on timeout — it keeps running unobserved.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::TaskFailed`] on a named failure status, carrying
    ///   the remote error message when one is present
    /// - [`GenerationError::EmptyResult`] on a success status with no tracks
    /// - [`GenerationError::Timeout`] when the budget elapses first
    pub async fn wait_for_track(
        &self,
        task_id: &TaskId,
        title: &str,
        on_status: Option<&StatusCallback>,
    ) -> Result<TrackResult> {
        let timeout = self.config().timeout;
        let interval = self.config().poll_interval;
        let mut elapsed = Duration::ZERO;

        while elapsed < timeout {
            let snapshot = self.poll(task_id).await?;

            if let Some(callback) = on_status {
                callback(task_id, title, snapshot.status);
            }

            if snapshot.status.is_complete() {
                let track = snapshot.tracks.into_iter().next().ok_or_else(|| {
                    GenerationError::EmptyResult {
                        task_id: task_id.clone(),
                    }
                })?;

                info!(title, duration = track.duration, "track complete");
                return Ok(TrackResult {
                    task_id: task_id.clone(),
                    title: track.title,
                    audio_url: track.audio_url,
                    duration: track.duration,
                    image_url: track.image_url,
                });
            }

            if snapshot.status.is_failed() {
                let message = snapshot
                    .error_message
                    .unwrap_or_else(|| "unknown error".to_string());
                return Err(GenerationError::TaskFailed {
                    title: title.to_string(),
                    status: snapshot.status,
                    message,
                }
                .into());
            }

            debug!(title, status = %snapshot.status, "track still generating");
            tokio::time::sleep(interval).await;
            elapsed += interval;
        }

        Err(GenerationError::Timeout {
            title: title.to_string(),
            waited_secs: timeout.as_secs(),
        }
        .into())
    }

    /// Submit a request and poll it to completion
    pub async fn generate_and_wait(
        &self,
        request: &TrackRequest,
        on_status: Option<&StatusCallback>,
    ) -> Result<TrackResult> {
        let task_id = self.submit(request).await?;
        self.wait_for_track(&task_id, &request.title, on_status).await
    }
}
