//! Audio processing: track download, mix rendering, and warmth mastering
//!
//! Three stages, in pipeline order:
//!
//! 1. [`TrackDownloader`] pulls finished tracks from their CDN URLs with
//!    bounded parallelism.
//! 2. [`AudioMixer`] normalizes every track to a common loudness target and
//!    joins them back to back or with crossfades, in one ffmpeg invocation.
//! 3. [`WarmthProcessor`] runs the finished mix through a subtle mastering
//!    chain (shelving EQ, slow chorus drift, room echo, compression).
//!
//! The mixer and warmth processor shell out to ffmpeg; their filter graphs
//! are built by pure functions so the argument strings can be tested without
//! the binary installed.

mod downloader;
mod mixer;
mod warmth;

pub use downloader::TrackDownloader;
pub use mixer::{AudioMixer, MixedAudio};
pub use warmth::WarmthProcessor;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
