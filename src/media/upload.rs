//! Unsigned image uploads to the media host.
//!
//! The admin sends raw image bytes; they are forwarded as a multipart form
//! and the host's public `secure_url` comes back. That URL is what later
//! goes into an event's cover field.

use std::time::Duration;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::MediaConfig;
use crate::error::SiteError;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    error: Option<UploadError>,
}

#[derive(Debug, Deserialize)]
struct UploadError {
    message: String,
}

/// Client for the media host's unsigned upload endpoint.
#[derive(Debug, Clone)]
pub struct MediaUploader {
    client: Client,
    config: MediaConfig,
}

impl MediaUploader {
    /// Builds an uploader for the given account and preset.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: MediaConfig, timeout: Duration) -> Result<Self, SiteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.api_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Uploads one image and returns its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidRequest`] for an empty body or a bad
    /// content type, and [`SiteError::MediaUpload`] when the host rejects
    /// the upload or answers without a URL.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<String, SiteError> {
        if bytes.is_empty() {
            return Err(SiteError::InvalidRequest("empty upload".to_string()));
        }
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| SiteError::InvalidRequest(format!("content type: {e}")))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", self.config.folder.clone());

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let code = status.as_u16();
        let text = response.text().await?;
        let parsed: Option<UploadResponse> = serde_json::from_str(&text).ok();

        match parsed {
            Some(UploadResponse {
                secure_url: Some(url),
                ..
            }) if status.is_success() => {
                tracing::info!(filename, size, url = %url, "image uploaded");
                Ok(url)
            }
            Some(UploadResponse {
                error: Some(err),
                ..
            }) => Err(SiteError::MediaUpload(err.message)),
            _ => Err(SiteError::MediaUpload(format!("{code} {text}"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use axum::body::Bytes;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    fn uploader(api_url: String) -> MediaUploader {
        let config = MediaConfig {
            cloud_name: "demo".to_string(),
            upload_preset: "unsigned_events".to_string(),
            folder: "nomadisch/events".to_string(),
            api_url,
        };
        let Ok(uploader) = MediaUploader::new(config, Duration::from_secs(5)) else {
            panic!("client builds");
        };
        uploader
    }

    #[tokio::test]
    async fn returns_secure_url() {
        let router = Router::new().route(
            "/demo/image/upload",
            post(|body: Bytes| async move {
                let body = String::from_utf8_lossy(&body).to_string();
                if body.contains("unsigned_events") && body.contains("nomadisch/events") {
                    (
                        StatusCode::OK,
                        Json(json!({ "secure_url": "https://media.example/demo/cover.jpg" })),
                    )
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": { "message": "missing preset" } })),
                    )
                }
            }),
        );
        let base = serve(router).await;
        let result = uploader(base)
            .upload(vec![0xFF, 0xD8, 0xFF], "flyer.jpg", "image/jpeg")
            .await;
        assert_eq!(
            result.ok().as_deref(),
            Some("https://media.example/demo/cover.jpg")
        );
    }

    #[tokio::test]
    async fn host_error_message_is_surfaced() {
        let router = Router::new().route(
            "/demo/image/upload",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": { "message": "Upload preset not found" } })),
                )
            }),
        );
        let base = serve(router).await;
        let result = uploader(base).upload(vec![1, 2, 3], "a.png", "image/png").await;
        let Err(SiteError::MediaUpload(message)) = result else {
            panic!("expected upload error");
        };
        assert_eq!(message, "Upload preset not found");
    }

    #[tokio::test]
    async fn empty_body_is_rejected_locally() {
        let result = uploader("http://127.0.0.1:9".to_string())
            .upload(Vec::new(), "a.png", "image/png")
            .await;
        assert!(matches!(result, Err(SiteError::InvalidRequest(_))));
    }
}
