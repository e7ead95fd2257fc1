//! Bounded fan-out over many submit+poll sequences

use crate::error::{Error, GenerationError, Result};
use crate::types::{TaskId, TaskStatus, TrackRequest, TrackResult};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::info;

use super::SunoClient;

/// Progress callback invoked on every poll tick with
/// `(task_id, title, status)`
///
/// The return value is ignored; the callback must not block.
pub type StatusCallback = Arc<dyn Fn(&TaskId, &str, TaskStatus) + Send + Sync>;

impl SunoClient {
    /// Generate many tracks concurrently, capped at the configured limit
    ///
    /// Every request gets its own submit+poll sequence. A semaphore admits at
    /// most `max_concurrent` sequences at a time; the permit covers the whole
    /// sequence, submission included, so queued requests are not even
    /// submitted until a slot frees. Sequences run independently — a failing
    /// sequence does not cancel its siblings.
    ///
    /// All sequences are driven to completion before this returns. On
    /// success the results come back reindexed to request order, whatever
    /// order the tasks actually finished in.
    ///
    /// # Errors
    ///
    /// If any sequence failed, returns [`GenerationError::Batch`] for the
    /// first failure in request order, carrying its 1-based index and title.
    /// Results from sequences that succeeded are discarded; this is an
    /// all-or-nothing contract.
    pub async fn generate_tracks_parallel(
        &self,
        requests: &[TrackRequest],
        on_status: Option<StatusCallback>,
    ) -> Result<Vec<TrackResult>> {
        info!(count = requests.len(), "starting parallel track generation");

        let gate = Arc::new(Semaphore::new(self.config().max_concurrent));

        let sequences = requests.iter().map(|request| {
            let gate = Arc::clone(&gate);
            let on_status = on_status.clone();
            async move {
                let _permit = gate
                    .acquire_owned()
                    .await
                    .map_err(|_| Error::Other("admission gate closed".to_string()))?;
                self.generate_and_wait(request, on_status.as_ref()).await
            }
        });

        let outcomes = futures::future::join_all(sequences).await;

        let mut results = Vec::with_capacity(outcomes.len());
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(result) => results.push(result),
                Err(err) => {
                    return Err(GenerationError::Batch {
                        index: index + 1,
                        title: requests[index].title.clone(),
                        source: Box::new(err),
                    }
                    .into());
                }
            }
        }

        info!(count = results.len(), "all tracks generated");
        Ok(results)
    }
}
