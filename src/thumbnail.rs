//! Thumbnail sourcing: pre-rendered asset pool first, generated image second
//!
//! Runs that keep a directory of hand-picked artwork get one of those at
//! random. When the pool is empty the generator asks the text model for a
//! fresh image prompt, renders it with the image model, and writes the
//! bytes out. With neither a pool nor an API key configured, thumbnail
//! sourcing fails up front rather than mid-pipeline.

use crate::config::ThumbnailConfig;
use crate::error::{Result, ThumbnailError};
use crate::gemini::GeminiClient;
use crate::presets::THUMBNAIL_PROMPT;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const ASSET_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Sources the run's artwork image
pub struct ThumbnailGenerator {
    config: ThumbnailConfig,
    gemini: Option<GeminiClient>,
}

impl ThumbnailGenerator {
    /// Create a generator; `gemini` may be absent when only local assets
    /// are in play
    pub fn new(config: ThumbnailConfig, gemini: Option<GeminiClient>) -> Self {
        Self { config, gemini }
    }

    /// Produce the artwork image at `output`
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::NoSource`] when the asset pool is empty
    /// and no generative client is configured, or
    /// [`ThumbnailError::AssetUnusable`] when a chosen asset cannot be
    /// copied.
    pub async fn generate(&self, output: &Path) -> Result<PathBuf> {
        let assets = self.asset_images().await?;
        if !assets.is_empty() {
            debug!(pool = assets.len(), "choosing from pre-rendered thumbnails");
            return self.pick_asset(&assets, output).await;
        }

        let Some(client) = &self.gemini else {
            return Err(ThumbnailError::NoSource.into());
        };

        info!("no pre-rendered thumbnails, generating artwork");
        let image_prompt = client.generate_text(THUMBNAIL_PROMPT).await?;
        debug!(prompt = %image_prompt, "image prompt");
        let bytes = client.generate_image(&image_prompt).await?;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, &bytes).await?;
        info!(output = %output.display(), bytes = bytes.len(), "artwork generated");
        Ok(output.to_path_buf())
    }

    /// Image files in the configured assets directory; empty when the
    /// directory is missing
    async fn asset_images(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.config.assets_directory).await {
            Ok(entries) => entries,
            Err(_) => return Ok(Vec::new()),
        };

        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ASSET_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                });
            if is_image {
                images.push(path);
            }
        }
        Ok(images)
    }

    async fn pick_asset(&self, assets: &[PathBuf], output: &Path) -> Result<PathBuf> {
        // ThreadRng is not Send; scope it away from the awaits below
        let selected = {
            let mut rng = rand::thread_rng();
            assets.choose(&mut rng).ok_or(ThumbnailError::NoSource)?
        };

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(selected, output)
            .await
            .map_err(|e| ThumbnailError::AssetUnusable {
                path: selected.clone(),
                detail: e.to_string(),
            })?;

        info!(asset = %selected.display(), output = %output.display(), "selected pre-rendered thumbnail");
        Ok(output.to_path_buf())
    }
}
