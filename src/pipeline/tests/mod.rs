use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_string, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{MixPipeline, read_manifest, write_manifest};
use crate::config::Config;
use crate::error::Error;
use crate::types::{Event, MixManifest, MixParams, Phase, PrivacyStatus, TrackSummary};

fn test_config() -> Config {
    let mut config = Config::default();
    config.suno.api_key = "test-key".to_string();
    config.tools.ffmpeg_path = Some(PathBuf::from("/nonexistent/ffmpeg"));
    config.tools.ffprobe_path = Some(PathBuf::from("/nonexistent/ffprobe"));
    config
}

fn test_pipeline() -> MixPipeline {
    MixPipeline::new(test_config()).expect("pipeline should construct")
}

fn sample_manifest() -> MixManifest {
    MixManifest {
        title: "Deep Focus Mix".to_string(),
        description: "2 Hours 3 Minutes of Chill Deep House.".to_string(),
        tags: vec!["focus music".to_string(), "deep house".to_string()],
        hashtags: vec!["#FlowState".to_string()],
        mood: "FOCUS".to_string(),
        genre: "deep_house".to_string(),
        genre_name: "Chill Deep House".to_string(),
        bpm: 110,
        track_count: 2,
        total_duration_secs: 7380.0,
        tracks: vec![
            TrackSummary {
                title: "Neon Drift".to_string(),
                duration: 3690.0,
            },
            TrackSummary {
                title: "Glass Harbor".to_string(),
                duration: 3690.0,
            },
        ],
        generated_at: Utc::now(),
        youtube_id: None,
        youtube_url: None,
        published_at: None,
    }
}

#[test]
fn construction_requires_an_api_key() {
    let err = match MixPipeline::new(Config::default()) {
        Ok(_) => panic!("expected construction to fail without an API key"),
        Err(e) => e,
    };
    match err {
        Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("suno.api_key")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn construction_succeeds_with_explicit_tool_paths() {
    assert!(MixPipeline::new(test_config()).is_ok());
}

#[tokio::test]
async fn generate_rejects_unknown_genre() {
    let pipeline = test_pipeline();
    let params = MixParams {
        genre: "vaporwave".to_string(),
        ..MixParams::default()
    };

    let err = pipeline.generate(&params).await.unwrap_err();
    match err {
        Error::NotFound(message) => assert!(message.contains("unknown genre 'vaporwave'")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn generate_rejects_blank_mood() {
    let pipeline = test_pipeline();
    let params = MixParams {
        mood: "   ".to_string(),
        ..MixParams::default()
    };

    let err = pipeline.generate(&params).await.unwrap_err();
    match err {
        Error::Config { message, key } => {
            assert!(message.contains("mood"));
            assert!(key.is_none());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn generate_rejects_zero_track_count() {
    let pipeline = test_pipeline();
    let params = MixParams {
        track_count: 0,
        ..MixParams::default()
    };

    let err = pipeline.generate(&params).await.unwrap_err();
    match err {
        Error::Config { message, .. } => assert!(message.contains("track_count")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn manifest_round_trips_through_pretty_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("FOCUS_deep_house_20250101_120000.json");
    let manifest = sample_manifest();

    write_manifest(&path, &manifest).await.unwrap();

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(raw.contains("\n  \"title\""), "manifest should be pretty-printed");
    assert!(
        !raw.contains("youtube_id"),
        "unpublished manifests should omit the video identity"
    );

    let back = read_manifest(&path).await.unwrap();
    assert_eq!(back, manifest);
}

#[tokio::test]
async fn read_manifest_reports_missing_file() {
    let err = read_manifest(Path::new("/nonexistent/run/run.json"))
        .await
        .unwrap_err();
    match err {
        Error::NotFound(message) => assert!(message.contains("manifest not found")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn load_output_reconstructs_artifact_paths() {
    let dir = tempdir().unwrap();
    let run_dir = dir.path().join("FOCUS_deep_house_20250101_120000");
    tokio::fs::create_dir_all(&run_dir).await.unwrap();
    let manifest = sample_manifest();
    write_manifest(
        &run_dir.join("FOCUS_deep_house_20250101_120000.json"),
        &manifest,
    )
    .await
    .unwrap();

    let pipeline = test_pipeline();
    let output = pipeline.load_output(&run_dir).await.unwrap();

    assert_eq!(output.run_dir, run_dir);
    assert_eq!(
        output.audio_path,
        run_dir.join("FOCUS_deep_house_20250101_120000.mp3")
    );
    assert_eq!(
        output.video_path,
        run_dir.join("FOCUS_deep_house_20250101_120000.mp4")
    );
    assert_eq!(
        output.thumbnail_path,
        run_dir.join("FOCUS_deep_house_20250101_120000_yt_thumb.png")
    );
    assert!((output.total_duration_secs - manifest.total_duration_secs).abs() < f64::EPSILON);
}

#[tokio::test]
async fn load_output_requires_a_manifest() {
    let dir = tempdir().unwrap();
    let run_dir = dir.path().join("FOCUS_deep_house_20250101_120000");
    tokio::fs::create_dir_all(&run_dir).await.unwrap();

    let pipeline = test_pipeline();
    let err = pipeline.load_output(&run_dir).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn publish_uploads_and_updates_the_manifest() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let secrets_path = dir.path().join("credentials.json");
    std::fs::write(
        &secrets_path,
        r#"{"installed":{"client_id":"cid","client_secret":"sec"}}"#,
    )
    .unwrap();
    let token_path = dir.path().join("token.json");
    std::fs::write(&token_path, r#"{"refresh_token":"rt-1"}"#).unwrap();

    let run_dir = dir.path().join("FOCUS_deep_house_20250101_120000");
    tokio::fs::create_dir_all(&run_dir).await.unwrap();
    std::fs::write(
        run_dir.join("FOCUS_deep_house_20250101_120000.mp4"),
        b"video-bytes",
    )
    .unwrap();
    std::fs::write(
        run_dir.join("FOCUS_deep_house_20250101_120000_yt_thumb.png"),
        b"png-bytes",
    )
    .unwrap();
    write_manifest(
        &run_dir.join("FOCUS_deep_house_20250101_120000.json"),
        &sample_manifest(),
    )
    .await
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at-123",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .mount(&server)
        .await;
    let session_url = format!("{}/upload/session-1", server.uri());
    Mock::given(method("POST"))
        .and(path("/upload/youtube/v3/videos"))
        .and(query_param("uploadType", "resumable"))
        .respond_with(ResponseTemplate::new(200).insert_header("location", session_url.as_str()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/session-1"))
        .and(body_string("video-bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "vid-99" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/youtube/v3/thumbnails/set"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.youtube.client_secrets_path = secrets_path;
    config.youtube.token_path = token_path;
    config.youtube.token_url = format!("{}/token", server.uri());
    config.youtube.api_base = server.uri();
    let pipeline = MixPipeline::new(config).unwrap();

    let output = pipeline.load_output(&run_dir).await.unwrap();
    let mut events = pipeline.subscribe();

    let receipt = pipeline
        .publish(&output, PrivacyStatus::Unlisted)
        .await
        .unwrap();
    assert_eq!(receipt.video_id, "vid-99");
    assert_eq!(receipt.url, "https://youtube.com/watch?v=vid-99");

    let updated = read_manifest(&output.manifest_path).await.unwrap();
    assert_eq!(updated.youtube_id.as_deref(), Some("vid-99"));
    assert_eq!(
        updated.youtube_url.as_deref(),
        Some("https://youtube.com/watch?v=vid-99")
    );
    assert!(updated.published_at.is_some());

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(matches!(
        seen.first(),
        Some(Event::PhaseStarted {
            phase: Phase::Publish
        })
    ));
    assert!(
        seen.iter()
            .any(|e| matches!(e, Event::PublishStarted { title } if title == "Deep Focus Mix"))
    );
    assert!(
        seen.iter()
            .any(|e| matches!(e, Event::PublishCompleted { video_id, .. } if video_id == "vid-99"))
    );
    assert!(matches!(
        seen.last(),
        Some(Event::PhaseCompleted {
            phase: Phase::Publish
        })
    ));
}

#[tokio::test]
async fn publish_surfaces_upload_failures() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let secrets_path = dir.path().join("credentials.json");
    std::fs::write(
        &secrets_path,
        r#"{"installed":{"client_id":"cid","client_secret":"sec"}}"#,
    )
    .unwrap();
    let token_path = dir.path().join("token.json");
    std::fs::write(&token_path, r#"{"refresh_token":"rt-1"}"#).unwrap();

    let run_dir = dir.path().join("FOCUS_deep_house_20250101_120000");
    tokio::fs::create_dir_all(&run_dir).await.unwrap();
    std::fs::write(
        run_dir.join("FOCUS_deep_house_20250101_120000.mp4"),
        b"video-bytes",
    )
    .unwrap();
    write_manifest(
        &run_dir.join("FOCUS_deep_house_20250101_120000.json"),
        &sample_manifest(),
    )
    .await
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at-123"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/youtube/v3/videos"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({
                "error": { "message": "quotaExceeded" }
            })),
        )
        .mount(&server)
        .await;

    let mut config = test_config();
    config.youtube.client_secrets_path = secrets_path;
    config.youtube.token_path = token_path;
    config.youtube.token_url = format!("{}/token", server.uri());
    config.youtube.api_base = server.uri();
    let pipeline = MixPipeline::new(config).unwrap();

    let output = pipeline.load_output(&run_dir).await.unwrap();
    let err = pipeline
        .publish(&output, PrivacyStatus::Private)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("quotaExceeded"));

    // The manifest must stay untouched when the upload never happened
    let manifest = read_manifest(&output.manifest_path).await.unwrap();
    assert!(manifest.youtube_id.is_none());
}
