//! Parallel track download with bounded concurrency

use crate::error::{DownloadError, Error, Result};
use futures::StreamExt;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio::{io::AsyncWriteExt, sync::Semaphore};
use tracing::{debug, info};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads generated tracks from their CDN URLs
///
/// Transfers run in parallel, capped by a semaphore so a large batch does
/// not open one connection per track at once. Results come back in input
/// order regardless of completion order.
pub struct TrackDownloader {
    http: reqwest::Client,
    concurrency: usize,
}

impl TrackDownloader {
    /// Create a downloader with the given parallel transfer cap
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the HTTP client cannot be constructed.
    pub fn new(concurrency: usize) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { http, concurrency })
    }

    /// Download a single file, streaming the body to disk
    ///
    /// Parent directories are created as needed. The file is written chunk
    /// by chunk, so track-sized bodies never sit in memory whole.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Http`] for a non-success status, or
    /// [`Error::Network`]/[`Error::Io`] for transfer and filesystem
    /// failures.
    pub async fn download_file(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;

        debug!(url, dest = %dest.display(), "downloaded track");
        Ok(dest.to_path_buf())
    }

    /// Download every URL into `dest_dir`, returning paths in input order
    ///
    /// When `filenames` is given it must match `urls` in length and names
    /// each file; otherwise files are numbered `track_01.mp3`,
    /// `track_02.mp3`, and so on. All transfers run to completion; if any
    /// failed, the first failure in input order is returned and no paths
    /// are.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::FilenameCount`] on a length mismatch, or
    /// [`DownloadError::Batch`] carrying the first failed transfer.
    pub async fn download_tracks(
        &self,
        urls: &[String],
        dest_dir: &Path,
        filenames: Option<&[String]>,
    ) -> Result<Vec<PathBuf>> {
        if let Some(names) = filenames
            && names.len() != urls.len()
        {
            return Err(DownloadError::FilenameCount {
                expected: urls.len(),
                actual: names.len(),
            }
            .into());
        }
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        tokio::fs::create_dir_all(dest_dir).await?;

        let gate = Arc::new(Semaphore::new(self.concurrency));
        let transfers = urls.iter().enumerate().map(|(index, url)| {
            let gate = Arc::clone(&gate);
            let name = match filenames {
                Some(names) => names[index].clone(),
                None => format!("track_{:02}.mp3", index + 1),
            };
            let dest = dest_dir.join(name);
            async move {
                let _permit = gate
                    .acquire_owned()
                    .await
                    .map_err(|_| Error::Other("download gate closed".to_string()))?;
                self.download_file(url, &dest).await
            }
        });

        let outcomes = futures::future::join_all(transfers).await;

        let mut paths = Vec::with_capacity(urls.len());
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(path) => paths.push(path),
                Err(err) => {
                    return Err(DownloadError::Batch {
                        index: index + 1,
                        source: Box::new(err),
                    }
                    .into());
                }
            }
        }

        let mut total_bytes = 0u64;
        for path in &paths {
            total_bytes += tokio::fs::metadata(path).await?.len();
        }
        let total_mb = total_bytes as f64 / (1024.0 * 1024.0);
        info!(
            tracks = paths.len(),
            size_mb = %format!("{total_mb:.1}"),
            "downloaded all tracks"
        );

        Ok(paths)
    }
}
