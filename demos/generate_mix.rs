//! End-to-end mix generation demo
//!
//! Usage: cargo run --release --example generate_mix
//!
//! Reads credentials from the environment (or a `.env` file): SUNO_API_KEY
//! is required, GEMINI_API_KEY enables AI titles and generated artwork.
//! MIX_MOOD, MIX_GENRE, and MIX_TRACKS select what to generate; set
//! MIX_PUBLISH=1 (and optionally MIX_PRIVACY) to upload the result.

use mixforge::{Config, Event, MixParams, MixPipeline, PrivacyStatus};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let mood = std::env::var("MIX_MOOD").unwrap_or_else(|_| "FOCUS".to_string());
    let genre = std::env::var("MIX_GENRE").unwrap_or_else(|_| "dark_synthwave".to_string());
    let track_count: usize = std::env::var("MIX_TRACKS")
        .ok()
        .and_then(|n| n.parse().ok())
        .unwrap_or(4);

    let genres = mixforge::presets::all_presets()
        .iter()
        .map(|preset| preset.key)
        .collect::<Vec<_>>()
        .join(", ");

    println!("═══════════════════════════════════════════════════════════");
    println!("  mixforge demo");
    println!("═══════════════════════════════════════════════════════════");
    println!("  Mood:   {mood}");
    println!("  Genre:  {genre} (available: {genres})");
    println!("  Tracks: {track_count}");
    println!("═══════════════════════════════════════════════════════════");

    let config = Config::from_env()?;
    let pipeline = MixPipeline::new(config)?;

    let mut events = pipeline.subscribe();
    let progress = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(Event::PipelineStarted {
                    mood,
                    genre,
                    track_count,
                }) => {
                    println!("\n  [START] {mood} {genre} ({track_count} tracks)");
                }
                Ok(Event::PhaseStarted { phase }) => println!("  [PHASE] {phase}"),
                Ok(Event::PhaseCompleted { phase }) => println!("  [PHASE DONE] {phase}"),
                Ok(Event::TrackStatus { title, status, .. }) => {
                    println!("    [TRACK] {title}: {status:?}");
                }
                Ok(Event::TrackCompleted {
                    title, duration, ..
                }) => {
                    println!("    [TRACK DONE] {title} ({duration:.0}s)");
                }
                Ok(Event::TracksDownloaded { count }) => {
                    println!("    [DOWNLOADED] {count} files");
                }
                Ok(Event::MixRendered {
                    path,
                    duration_secs,
                }) => {
                    println!("    [MIX] {} ({duration_secs:.0}s)", path.display());
                }
                Ok(Event::ThumbnailReady { path }) => {
                    println!("    [ART] {}", path.display());
                }
                Ok(Event::VideoRendered { path }) => {
                    println!("    [VIDEO] {}", path.display());
                }
                Ok(Event::ManifestWritten { path }) => {
                    println!("    [MANIFEST] {}", path.display());
                }
                Ok(Event::PipelineCompleted { run_dir, .. }) => {
                    println!("\n  [COMPLETE] {}", run_dir.display());
                }
                Ok(Event::PublishStarted { title }) => println!("  [UPLOAD] {title}"),
                Ok(Event::PublishCompleted { url, .. }) => println!("  [PUBLISHED] {url}"),
                Err(RecvError::Lagged(n)) => {
                    eprintln!("  [WARNING] Event receiver lagged, missed {n} events!");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let output = pipeline
        .generate(&MixParams {
            mood,
            genre,
            track_count,
        })
        .await?;

    println!("\n═══════════════════════════════════════════════════════════");
    println!("  Results");
    println!("═══════════════════════════════════════════════════════════");
    println!("  Run dir:    {}", output.run_dir.display());
    println!("  Audio:      {}", output.audio_path.display());
    println!("  Video:      {}", output.video_path.display());
    println!("  Thumbnail:  {}", output.thumbnail_path.display());
    println!("  Manifest:   {}", output.manifest_path.display());
    println!(
        "  Length:     {:.0}s ({:.1}h)",
        output.total_duration_secs,
        output.total_duration_secs / 3600.0
    );

    let wants_publish = std::env::var("MIX_PUBLISH")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if wants_publish {
        let privacy = match std::env::var("MIX_PRIVACY").as_deref() {
            Ok("public") => PrivacyStatus::Public,
            Ok("unlisted") => PrivacyStatus::Unlisted,
            _ => PrivacyStatus::Private,
        };
        let receipt = pipeline.publish(&output, privacy).await?;
        println!("  Published:  {}", receipt.url);
    }
    println!("═══════════════════════════════════════════════════════════");

    progress.abort();
    Ok(())
}
