//! # mixforge
//!
//! Backend library for automated long-form music mix production and
//! publishing.
//!
//! One call takes a mood and a genre preset through AI track generation,
//! parallel downloads, loudness-normalized mixing, optional warmth
//! mastering, still-image video composition with an audio visualizer, and
//! YouTube-ready metadata, then optionally publishes the result with a
//! stored OAuth refresh token.
//!
//! ## Design Philosophy
//!
//! mixforge is designed to be:
//! - **Highly configurable** - Every stage exposes its knobs, from crossfade
//!   length to visualizer placement
//! - **Sensible defaults** - A mood, a genre, and an API key are enough for
//!   a full run
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use mixforge::{Config, MixParams, MixPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.suno.api_key = "your-api-key".to_string();
//!
//!     let pipeline = MixPipeline::new(config)?;
//!
//!     // Subscribe to progress events
//!     let mut events = pipeline.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let output = pipeline
//!         .generate(&MixParams {
//!             mood: "FOCUS".to_string(),
//!             genre: "deep_house".to_string(),
//!             track_count: 10,
//!         })
//!         .await?;
//!
//!     println!("Video rendered at {}", output.video_path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Track download, mixing, and warmth mastering
pub mod audio;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Generative text and image client
pub mod gemini;
/// Track generation against the remote music API
pub mod generation;
/// Video platform metadata builders
pub mod metadata;
/// End-to-end pipeline orchestration
pub mod pipeline;
/// Genre presets and prompt templates
pub mod presets;
/// Thumbnail sourcing
pub mod thumbnail;
/// Track title generation
pub mod titles;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;
/// Still-image video composition
pub mod video;
/// Video upload client
pub mod youtube;

// Re-export commonly used types
pub use config::Config;
pub use error::{
    AudioError, ComposeError, DownloadError, Error, GenerationError, GenerativeError,
    PublishError, Result, ThumbnailError,
};
pub use pipeline::MixPipeline;
pub use presets::GenrePreset;
pub use types::{
    Event, MixManifest, MixOutput, MixParams, Phase, PrivacyStatus, PublishReceipt, TaskId,
    TaskStatus, TrackRequest, TrackResult, TrackSummary,
};
