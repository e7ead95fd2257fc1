//! Video publishing over the platform's REST upload API
//!
//! Auth is refresh-token only: the one-time browser consent flow happens
//! outside this tool, leaving a token file with a `refresh_token` field.
//! Each upload exchanges that for a fresh access token, opens a resumable
//! upload session, and streams the video bytes to the session URL in a
//! single PUT. Thumbnail setting is best-effort; the platform rejects it
//! for unverified accounts and the upload stands either way.

use crate::config::YouTubeConfig;
use crate::error::{PublishError, Result};
use crate::types::{PrivacyStatus, PublishReceipt};
use crate::utils::truncate_detail;
use chrono::Utc;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::Body;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const VIDEO_MIME: &str = "video/mp4";

/// Everything needed to publish one finished mix
#[derive(Debug, Clone)]
pub struct UploadRequest<'a> {
    /// The video file to upload
    pub video: &'a Path,
    /// Optional custom thumbnail image
    pub thumbnail: Option<&'a Path>,
    /// Video title
    pub title: &'a str,
    /// Video description
    pub description: &'a str,
    /// Platform tags
    pub tags: &'a [String],
    /// Platform category ID
    pub category_id: &'a str,
    /// Visibility of the published video
    pub privacy: PrivacyStatus,
}

/// Client for the video platform's upload API
pub struct YouTubeClient {
    http: reqwest::Client,
    config: YouTubeConfig,
}

impl YouTubeClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Network`] when the HTTP client cannot
    /// be built.
    pub fn new(config: YouTubeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    /// Upload a video and return its remote identity
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] variants for missing credentials, a failed
    /// token refresh, or a failed upload. A thumbnail failure is logged and
    /// swallowed.
    pub async fn upload(&self, request: UploadRequest<'_>) -> Result<PublishReceipt> {
        let token = self.access_token().await?;
        let size = tokio::fs::metadata(request.video).await?.len();
        info!(
            video = %request.video.display(),
            title = request.title,
            privacy = %request.privacy,
            size_mb = %format!("{:.1}", size as f64 / 1_048_576.0),
            "uploading video"
        );

        let session_url = self.begin_upload_session(&token, &request, size).await?;
        let video_id = self
            .stream_video(&token, &session_url, request.video, size)
            .await?;

        if let Some(thumbnail) = request.thumbnail {
            self.set_thumbnail(&token, &video_id, thumbnail).await;
        }

        let url = format!("https://youtube.com/watch?v={video_id}");
        info!(video_id, url, "upload complete");
        Ok(PublishReceipt {
            video_id,
            url,
            published_at: Utc::now(),
        })
    }

    /// Exchange the stored refresh token for an access token
    async fn access_token(&self) -> Result<String> {
        let secrets = self.load_secrets().await?;
        let refresh_token = self.load_refresh_token().await?;

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("client_id", secrets.client_id.as_str()),
                ("client_secret", secrets.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PublishError::TokenRefreshFailed {
                status: status.as_u16(),
                detail: truncate_detail(&detail),
            }
            .into());
        }

        let token: TokenResponse = response.json().await?;
        debug!("access token refreshed");
        Ok(token.access_token)
    }

    async fn load_secrets(&self) -> Result<AppSecrets> {
        let path = &self.config.client_secrets_path;
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| PublishError::MissingSecrets { path: path.clone() })?;
        parse_secrets(&raw, path)
    }

    async fn load_refresh_token(&self) -> Result<String> {
        let raw = tokio::fs::read_to_string(&self.config.token_path)
            .await
            .map_err(|_| PublishError::MissingRefreshToken)?;
        let token: StoredToken = serde_json::from_str(&raw)?;
        token
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PublishError::MissingRefreshToken.into())
    }

    async fn begin_upload_session(
        &self,
        token: &str,
        request: &UploadRequest<'_>,
        size: u64,
    ) -> Result<String> {
        let url = format!(
            "{}/upload/youtube/v3/videos?uploadType=resumable&part=snippet,status",
            self.config.api_base
        );
        let body = json!({
            "snippet": {
                "title": request.title,
                "description": request.description,
                "tags": request.tags,
                "categoryId": request.category_id,
            },
            "status": {
                "privacyStatus": request.privacy,
                "selfDeclaredMadeForKids": false,
            },
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header("X-Upload-Content-Type", VIDEO_MIME)
            .header("X-Upload-Content-Length", size)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PublishError::UploadInitFailed {
                status: status.as_u16(),
                detail: truncate_detail(&detail),
            }
            .into());
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                PublishError::UploadInitFailed {
                    status: status.as_u16(),
                    detail: "no session URL in response".to_string(),
                }
                .into()
            })
    }

    async fn stream_video(
        &self,
        token: &str,
        session_url: &str,
        video: &Path,
        size: u64,
    ) -> Result<String> {
        let file = tokio::fs::File::open(video).await?;
        let stream = ReaderStream::new(file);

        let response = self
            .http
            .put(session_url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, VIDEO_MIME)
            .header(CONTENT_LENGTH, size)
            .body(Body::wrap_stream(stream))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PublishError::UploadFailed {
                status: status.as_u16(),
                detail: truncate_detail(&detail),
            }
            .into());
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(uploaded.id)
    }

    async fn set_thumbnail(&self, token: &str, video_id: &str, thumbnail: &Path) {
        match self.try_set_thumbnail(token, video_id, thumbnail).await {
            Ok(()) => info!(video_id, "thumbnail set"),
            Err(e) => {
                warn!(video_id, error = %e, "failed to set thumbnail (verified account required)");
            }
        }
    }

    async fn try_set_thumbnail(&self, token: &str, video_id: &str, thumbnail: &Path) -> Result<()> {
        let bytes = tokio::fs::read(thumbnail).await?;
        let url = format!(
            "{}/upload/youtube/v3/thumbnails/set?videoId={video_id}&uploadType=media",
            self.config.api_base
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "image/png")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PublishError::UploadFailed {
                status: status.as_u16(),
                detail: truncate_detail(&detail),
            }
            .into());
        }
        Ok(())
    }
}

/// Pull the app credentials out of a console-downloaded secrets file,
/// which nests them under either `installed` or `web`
pub(crate) fn parse_secrets(raw: &str, path: &Path) -> Result<AppSecrets> {
    let file: SecretsFile = serde_json::from_str(raw)?;
    file.installed.or(file.web).ok_or_else(|| {
        PublishError::MissingSecrets {
            path: path.to_path_buf(),
        }
        .into()
    })
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    installed: Option<AppSecrets>,
    web: Option<AppSecrets>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AppSecrets {
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct StoredToken {
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer, dir: &TempDir) -> YouTubeConfig {
        YouTubeConfig {
            client_secrets_path: dir.path().join("credentials.json"),
            token_path: dir.path().join("token.json"),
            token_url: format!("{}/token", server.uri()),
            api_base: server.uri(),
        }
    }

    async fn write_credentials(dir: &TempDir) {
        tokio::fs::write(
            dir.path().join("credentials.json"),
            json!({
                "installed": {
                    "client_id": "client-1.apps.example.com",
                    "client_secret": "s3cret",
                }
            })
            .to_string(),
        )
        .await
        .unwrap();
        tokio::fs::write(
            dir.path().join("token.json"),
            json!({ "token": "stale", "refresh_token": "refresh-1" }).to_string(),
        )
        .await
        .unwrap();
    }

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at-123",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .mount(server)
            .await;
    }

    fn request_for<'a>(video: &'a Path, tags: &'a [String]) -> UploadRequest<'a> {
        UploadRequest {
            video,
            thumbnail: None,
            title: "Deep Focus Mix",
            description: "Two hours of focus music.",
            tags,
            category_id: "10",
            privacy: PrivacyStatus::Unlisted,
        }
    }

    #[test]
    fn secrets_parse_from_installed_and_web_shapes() {
        let path = PathBuf::from("credentials.json");
        let installed = parse_secrets(
            r#"{"installed": {"client_id": "a", "client_secret": "b"}}"#,
            &path,
        )
        .unwrap();
        assert_eq!(installed.client_id, "a");

        let web = parse_secrets(r#"{"web": {"client_id": "c", "client_secret": "d"}}"#, &path)
            .unwrap();
        assert_eq!(web.client_secret, "d");

        let err = parse_secrets(r#"{"other": {}}"#, &path).unwrap_err();
        assert!(matches!(
            err,
            Error::Publish(PublishError::MissingSecrets { .. })
        ));
    }

    #[tokio::test]
    async fn missing_secrets_file_is_reported() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let client = YouTubeClient::new(test_config(&server, &dir)).unwrap();

        let tags = Vec::new();
        let err = client
            .upload(request_for(Path::new("video.mp4"), &tags))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Publish(PublishError::MissingSecrets { .. })
        ));
    }

    #[tokio::test]
    async fn token_file_without_refresh_token_is_rejected() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        write_credentials(&dir).await;
        tokio::fs::write(
            dir.path().join("token.json"),
            json!({ "token": "access-only" }).to_string(),
        )
        .await
        .unwrap();

        let client = YouTubeClient::new(test_config(&server, &dir)).unwrap();
        let tags = Vec::new();
        let err = client
            .upload(request_for(Path::new("video.mp4"), &tags))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Publish(PublishError::MissingRefreshToken)
        ));
    }

    #[tokio::test]
    async fn failed_token_refresh_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        write_credentials(&dir).await;
        let client = YouTubeClient::new(test_config(&server, &dir)).unwrap();

        let tags = Vec::new();
        let err = client
            .upload(request_for(Path::new("video.mp4"), &tags))
            .await
            .unwrap_err();
        match err {
            Error::Publish(PublishError::TokenRefreshFailed { status, detail }) => {
                assert_eq!(status, 400);
                assert!(detail.contains("invalid_grant"));
            }
            other => panic!("expected TokenRefreshFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_opens_a_session_then_streams_the_bytes() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        let session_url = format!("{}/upload-session/xyz", server.uri());
        Mock::given(method("POST"))
            .and(path("/upload/youtube/v3/videos"))
            .and(query_param("uploadType", "resumable"))
            .and(header("authorization", "Bearer at-123"))
            .and(body_partial_json(json!({
                "snippet": { "title": "Deep Focus Mix", "categoryId": "10" },
                "status": { "privacyStatus": "unlisted", "selfDeclaredMadeForKids": false }
            })))
            .respond_with(
                ResponseTemplate::new(200).insert_header("location", session_url.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/upload-session/xyz"))
            .and(header("content-type", "video/mp4"))
            .and(body_string("video-bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "vid-42" })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        write_credentials(&dir).await;
        let video = dir.path().join("mix.mp4");
        tokio::fs::write(&video, b"video-bytes").await.unwrap();

        let client = YouTubeClient::new(test_config(&server, &dir)).unwrap();
        let tags = vec!["coding music".to_string()];
        let receipt = client.upload(request_for(&video, &tags)).await.unwrap();

        assert_eq!(receipt.video_id, "vid-42");
        assert_eq!(receipt.url, "https://youtube.com/watch?v=vid-42");
    }

    #[tokio::test]
    async fn failed_session_init_surfaces_status_and_body() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/upload/youtube/v3/videos"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        write_credentials(&dir).await;
        let video = dir.path().join("mix.mp4");
        tokio::fs::write(&video, b"video-bytes").await.unwrap();

        let client = YouTubeClient::new(test_config(&server, &dir)).unwrap();
        let tags = Vec::new();
        let err = client.upload(request_for(&video, &tags)).await.unwrap_err();
        match err {
            Error::Publish(PublishError::UploadInitFailed { status, detail }) => {
                assert_eq!(status, 403);
                assert!(detail.contains("quota"));
            }
            other => panic!("expected UploadInitFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn thumbnail_failure_does_not_sink_the_upload() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        let session_url = format!("{}/upload-session/abc", server.uri());
        Mock::given(method("POST"))
            .and(path("/upload/youtube/v3/videos"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("location", session_url.as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/upload-session/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "vid-7" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/upload/youtube/v3/thumbnails/set"))
            .and(query_param("videoId", "vid-7"))
            .respond_with(ResponseTemplate::new(403).set_body_string("account not verified"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        write_credentials(&dir).await;
        let video = dir.path().join("mix.mp4");
        let thumbnail = dir.path().join("thumb.png");
        tokio::fs::write(&video, b"video-bytes").await.unwrap();
        tokio::fs::write(&thumbnail, b"png-bytes").await.unwrap();

        let client = YouTubeClient::new(test_config(&server, &dir)).unwrap();
        let tags = Vec::new();
        let mut request = request_for(&video, &tags);
        request.thumbnail = Some(&thumbnail);

        let receipt = client.upload(request).await.unwrap();
        assert_eq!(receipt.video_id, "vid-7");
    }
}
