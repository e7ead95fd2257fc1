//! End-to-end mix pipeline orchestration
//!
//! [`MixPipeline`] wires every stage together and drives one run from mood
//! and genre to a publishable video:
//!
//! 1. **Titles** - track titles from the text model or the offline word banks
//! 2. **Generation** - bounded parallel fan-out against the track API, run
//!    alongside **Artwork** (local asset pick or generative image)
//! 3. **Download** - parallel track downloads into the scratch directory
//! 4. **Mix** - loudness-normalized single-file mix
//! 5. **Master** - optional warmth pass over the finished mix
//! 6. **Compose** - thumbnail overlay render and still-image video encode
//! 7. **Metadata** - video title, description, tags, and the run manifest
//!
//! Every run gets its own directory under the configured output root, named
//! `{mood}_{genre}_{timestamp}`, holding the mix audio, the video, both
//! thumbnails, and a manifest JSON. [`MixPipeline::publish`] picks a finished
//! run back up from its manifest and uploads it.
//!
//! Progress is reported through a broadcast [`Event`] channel; subscribe
//! before calling [`MixPipeline::generate`] to observe phase transitions and
//! per-track status ticks.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::audio::{AudioMixer, TrackDownloader, WarmthProcessor};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::gemini::GeminiClient;
use crate::generation::{StatusCallback, SunoClient};
use crate::metadata::{self, MetadataGenerator};
use crate::presets;
use crate::thumbnail::ThumbnailGenerator;
use crate::titles::TitleGenerator;
use crate::types::{
    Event, MixManifest, MixOutput, MixParams, Phase, PrivacyStatus, PublishReceipt, TrackRequest,
    TrackSummary,
};
use crate::utils;
use crate::video::VideoComposer;
use crate::youtube::{UploadRequest, YouTubeClient};

/// Buffered events per subscriber before laggards start missing events
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Orchestrates a full mix run: generation, mixing, video, metadata, publish
///
/// Construction validates the configuration and resolves every external
/// dependency up front (HTTP clients, ffmpeg/ffprobe paths), so a pipeline
/// that constructs successfully will not fail on missing tools mid-run.
pub struct MixPipeline {
    config: Config,
    suno: SunoClient,
    titles: TitleGenerator,
    thumbnails: ThumbnailGenerator,
    metadata: MetadataGenerator,
    downloader: TrackDownloader,
    mixer: AudioMixer,
    warmth: WarmthProcessor,
    composer: VideoComposer,
    event_tx: broadcast::Sender<Event>,
}

impl MixPipeline {
    /// Build a pipeline from a validated configuration
    ///
    /// The Gemini client is constructed once here iff an API key is
    /// configured, and handed to the title, thumbnail, and metadata
    /// generators; without a key those components fall back to their offline
    /// paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration fails validation and
    /// [`Error::ToolNotFound`] when ffmpeg or ffprobe cannot be resolved.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let gemini = if config.gemini.api_key.trim().is_empty() {
            debug!("no Gemini API key configured, using offline fallbacks");
            None
        } else {
            Some(GeminiClient::new(&config.gemini)?)
        };

        let suno = SunoClient::new(config.suno.clone())?;
        let downloader = TrackDownloader::new(config.pipeline.download_concurrency)?;
        let mixer = AudioMixer::discover(config.mixer.clone(), &config.tools)?;
        let warmth = WarmthProcessor::discover(
            config.warmth.clone(),
            config.mixer.output_bitrate.clone(),
            &config.tools,
        )?;
        let composer = VideoComposer::discover(
            config.video.clone(),
            config.overlay.clone(),
            config.visualizer.clone(),
            &config.tools,
        )?;

        let titles = TitleGenerator::new(gemini.clone());
        let thumbnails = ThumbnailGenerator::new(config.thumbnail.clone(), gemini.clone());
        let metadata = MetadataGenerator::new(config.metadata.clone(), gemini);

        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            config,
            suno,
            titles,
            thumbnails,
            metadata,
            downloader,
            mixer,
            warmth,
            composer,
            event_tx,
        })
    }

    /// Subscribe to pipeline progress events
    ///
    /// Multiple subscribers are supported; each receives every event
    /// independently. A subscriber that falls more than 1000 events behind
    /// receives a `RecvError::Lagged` and skips ahead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mixforge::{Config, MixParams, MixPipeline};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let pipeline = MixPipeline::new(Config::from_env()?)?;
    ///
    ///     let mut events = pipeline.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             println!("{event:?}");
    ///         }
    ///     });
    ///
    ///     let output = pipeline.generate(&MixParams::default()).await?;
    ///     println!("video at {}", output.video_path.display());
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Run the full pipeline and return the paths of every artifact
    ///
    /// The run is all-or-nothing: the first stage failure aborts the run and
    /// whatever was already written stays on disk for inspection. Track
    /// generation and artwork sourcing run concurrently; everything else is
    /// sequential.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown genre key, [`Error::Config`]
    /// for an empty mood or zero track count, and the failing stage's error
    /// otherwise (generation, download, audio, compose, or I/O).
    pub async fn generate(&self, params: &MixParams) -> Result<MixOutput> {
        let preset = presets::preset(&params.genre)?;
        let mood = params.mood.trim().to_uppercase();
        if mood.is_empty() {
            return Err(Error::Config {
                message: "mood must not be empty".to_string(),
                key: None,
            });
        }
        if params.track_count == 0 {
            return Err(Error::Config {
                message: "track_count must be at least 1".to_string(),
                key: None,
            });
        }

        let started = Utc::now();
        let run_name = utils::run_dir_name(&mood, &params.genre, &started);
        let run_dir = self.config.pipeline.output_directory.join(&run_name);
        tokio::fs::create_dir_all(&run_dir).await?;
        let temp_tracks = self
            .config
            .pipeline
            .temp_directory
            .join(&run_name)
            .join("tracks");

        info!(
            mood = %mood,
            genre = %params.genre,
            track_count = params.track_count,
            run = %run_name,
            "starting mix pipeline"
        );
        self.emit(Event::PipelineStarted {
            mood: mood.clone(),
            genre: params.genre.clone(),
            track_count: params.track_count,
        });

        // Phase 1: track titles
        self.emit(Event::PhaseStarted {
            phase: Phase::Titles,
        });
        let titles = self.titles.generate(preset, params.track_count).await;
        let requests: Vec<TrackRequest> = titles
            .into_iter()
            .map(|title| TrackRequest {
                prompt: preset.prompt.to_string(),
                style: preset.style.to_string(),
                title,
                negative_tags: (!preset.negative_tags.is_empty())
                    .then(|| preset.negative_tags.to_string()),
            })
            .collect();
        self.emit(Event::PhaseCompleted {
            phase: Phase::Titles,
        });

        // Phases 2+3: track generation and artwork sourcing, concurrently
        self.emit(Event::PhaseStarted {
            phase: Phase::Generation,
        });
        self.emit(Event::PhaseStarted {
            phase: Phase::Artwork,
        });
        let artwork_path = run_dir.join(format!("{run_name}_thumb.png"));
        let status_tx = self.event_tx.clone();
        let on_status: StatusCallback = Arc::new(move |task_id, title, status| {
            status_tx
                .send(Event::TrackStatus {
                    task_id: task_id.clone(),
                    title: title.to_string(),
                    status,
                })
                .ok();
        });
        let (tracks, artwork) = tokio::join!(
            self.suno.generate_tracks_parallel(&requests, Some(on_status)),
            self.thumbnails.generate(&artwork_path),
        );
        let tracks = tracks?;
        let artwork = artwork?;
        for track in &tracks {
            self.emit(Event::TrackCompleted {
                task_id: track.task_id.clone(),
                title: track.title.clone(),
                duration: track.duration,
            });
        }
        self.emit(Event::PhaseCompleted {
            phase: Phase::Generation,
        });
        self.emit(Event::ThumbnailReady {
            path: artwork.clone(),
        });
        self.emit(Event::PhaseCompleted {
            phase: Phase::Artwork,
        });

        // Phase 4: download track audio
        self.emit(Event::PhaseStarted {
            phase: Phase::Download,
        });
        let urls: Vec<String> = tracks.iter().map(|t| t.audio_url.clone()).collect();
        let filenames: Vec<String> = tracks
            .iter()
            .enumerate()
            .map(|(index, track)| utils::track_filename(index, &track.title))
            .collect();
        let downloaded = self
            .downloader
            .download_tracks(&urls, &temp_tracks, Some(&filenames))
            .await?;
        self.emit(Event::TracksDownloaded {
            count: downloaded.len(),
        });
        self.emit(Event::PhaseCompleted {
            phase: Phase::Download,
        });

        // Phase 5: mix
        self.emit(Event::PhaseStarted { phase: Phase::Mix });
        let audio_path = run_dir.join(format!(
            "{run_name}.{}",
            self.config.mixer.output_format
        ));
        let mixed = self.mixer.mix(&downloaded, &audio_path).await?;
        self.emit(Event::MixRendered {
            path: audio_path.clone(),
            duration_secs: mixed.duration_secs,
        });
        self.emit(Event::PhaseCompleted { phase: Phase::Mix });

        // Phase 6: warmth mastering, in place over the mix
        let total_duration_secs = if self.config.warmth.enabled {
            self.emit(Event::PhaseStarted {
                phase: Phase::Master,
            });
            self.warmth.process(&audio_path, &audio_path).await?;
            // Crossfeed and echo tails can shift the length slightly
            let duration = self.mixer.probe_duration(&audio_path).await?;
            self.emit(Event::PhaseCompleted {
                phase: Phase::Master,
            });
            duration
        } else {
            mixed.duration_secs
        };

        // Phase 7: thumbnail overlay + video encode
        self.emit(Event::PhaseStarted {
            phase: Phase::Compose,
        });
        let video_path = run_dir.join(format!("{run_name}.mp4"));
        let composed = self
            .composer
            .compose(&artwork, &audio_path, &mood, &video_path)
            .await?;
        self.emit(Event::VideoRendered {
            path: composed.video_path.clone(),
        });
        self.emit(Event::PhaseCompleted {
            phase: Phase::Compose,
        });

        // Phase 8: platform metadata + manifest
        self.emit(Event::PhaseStarted {
            phase: Phase::Metadata,
        });
        let duration_hours = ((total_duration_secs as u64) / 3600).max(1);
        let title = self.metadata.video_title(preset, &mood, duration_hours).await;
        let summaries: Vec<TrackSummary> = tracks
            .iter()
            .map(|track| TrackSummary {
                title: track.title.clone(),
                duration: track.duration,
            })
            .collect();
        let description = self
            .metadata
            .description(preset, &mood, total_duration_secs, &summaries);
        let manifest = MixManifest {
            title,
            description,
            tags: metadata::tags(&mood, preset.name),
            hashtags: metadata::hashtags(&mood, preset.name),
            mood: mood.clone(),
            genre: params.genre.clone(),
            genre_name: preset.name.to_string(),
            bpm: preset.bpm,
            track_count: tracks.len(),
            total_duration_secs,
            tracks: summaries,
            generated_at: started,
            youtube_id: None,
            youtube_url: None,
            published_at: None,
        };
        let manifest_path = run_dir.join(format!("{run_name}.json"));
        write_manifest(&manifest_path, &manifest).await?;
        self.emit(Event::ManifestWritten {
            path: manifest_path.clone(),
        });
        self.emit(Event::PhaseCompleted {
            phase: Phase::Metadata,
        });

        if self.config.pipeline.cleanup_temp {
            let run_temp = self.config.pipeline.temp_directory.join(&run_name);
            if let Err(e) = tokio::fs::remove_dir_all(&run_temp).await {
                debug!(path = %run_temp.display(), error = %e, "temp cleanup skipped");
            }
        }

        self.emit(Event::PipelineCompleted {
            run_dir: run_dir.clone(),
            video_path: composed.video_path.clone(),
        });
        info!(
            run_dir = %run_dir.display(),
            duration_secs = total_duration_secs,
            "mix pipeline finished"
        );

        Ok(MixOutput {
            run_dir,
            audio_path,
            video_path: composed.video_path,
            thumbnail_path: composed.thumbnail_path,
            manifest_path,
            total_duration_secs,
        })
    }

    /// Upload a finished run and record the video identity in its manifest
    ///
    /// Reads the manifest for title, description, and tags, uploads the
    /// video with the overlaid thumbnail, then writes `youtube_id`,
    /// `youtube_url`, and `published_at` back into the manifest JSON. A
    /// thumbnail set failure is tolerated; the upload itself is not.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the manifest is missing and
    /// [`Error::Publish`] when credentials are unusable or the upload fails.
    pub async fn publish(
        &self,
        output: &MixOutput,
        privacy: PrivacyStatus,
    ) -> Result<PublishReceipt> {
        let mut manifest = read_manifest(&output.manifest_path).await?;

        self.emit(Event::PhaseStarted {
            phase: Phase::Publish,
        });
        self.emit(Event::PublishStarted {
            title: manifest.title.clone(),
        });

        let client = YouTubeClient::new(self.config.youtube.clone())?;
        let receipt = client
            .upload(UploadRequest {
                video: &output.video_path,
                thumbnail: Some(&output.thumbnail_path),
                title: &manifest.title,
                description: &manifest.description,
                tags: &manifest.tags,
                category_id: &self.config.metadata.category_id,
                privacy,
            })
            .await?;

        manifest.youtube_id = Some(receipt.video_id.clone());
        manifest.youtube_url = Some(receipt.url.clone());
        manifest.published_at = Some(receipt.published_at);
        write_manifest(&output.manifest_path, &manifest).await?;

        self.emit(Event::PublishCompleted {
            video_id: receipt.video_id.clone(),
            url: receipt.url.clone(),
        });
        self.emit(Event::PhaseCompleted {
            phase: Phase::Publish,
        });
        info!(video_id = %receipt.video_id, url = %receipt.url, "publish complete");

        Ok(receipt)
    }

    /// Reconstruct a [`MixOutput`] from an existing run directory
    ///
    /// Lets a caller publish a run produced earlier (or by another process)
    /// without re-running generation. The manifest is read to confirm the
    /// run is intact; artifact paths are derived from the directory name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Other`] for a path with no usable directory name and
    /// [`Error::NotFound`] when the manifest is missing or unreadable.
    pub async fn load_output(&self, run_dir: &Path) -> Result<MixOutput> {
        let name = run_dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::Other(format!("invalid run directory: {}", run_dir.display()))
            })?;

        let manifest_path = run_dir.join(format!("{name}.json"));
        let manifest = read_manifest(&manifest_path).await?;

        Ok(MixOutput {
            run_dir: run_dir.to_path_buf(),
            audio_path: run_dir.join(format!("{name}.{}", self.config.mixer.output_format)),
            video_path: run_dir.join(format!("{name}.mp4")),
            thumbnail_path: run_dir.join(format!("{name}_yt_thumb.png")),
            manifest_path,
            total_duration_secs: manifest.total_duration_secs,
        })
    }

    fn emit(&self, event: Event) {
        // send() errs only when no subscriber exists; events are best-effort
        self.event_tx.send(event).ok();
    }
}

/// Read and parse a run manifest
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the file cannot be read and
/// [`Error::Serialization`] when it does not parse as a manifest.
pub(crate) async fn read_manifest(path: &Path) -> Result<MixManifest> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|_| Error::NotFound(format!("manifest not found at {}", path.display())))?;
    Ok(serde_json::from_str(&raw)?)
}

async fn write_manifest(path: &Path, manifest: &MixManifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
