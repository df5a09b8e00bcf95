//! Site error types with HTTP status code mapping.
//!
//! [`SiteError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4002,
///     "message": "cover image is not reachable: HTTP 404 Not Found (https://cdn/x.jpg)",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`SiteError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status                  |
/// |-----------|---------------------|------------------------------|
/// | 1000–1999 | Validation          | 400 Bad Request              |
/// | 2000–2999 | Auth / Not Found    | 401 Unauthorized / 404       |
/// | 3000–3999 | Server / Config     | 500 Internal Server Error    |
/// | 4000–4999 | Cover image         | 422 Unprocessable Entity     |
/// | 5000–5999 | Upstream datastore  | 502 Bad Gateway              |
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// A required credential or setting is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Admin password missing or incorrect.
    #[error("unauthorized")]
    Unauthorized,

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The datastore answered with a non-2xx status.
    #[error("datastore request failed: {status} {body}")]
    StoreRequest {
        /// HTTP status returned by the datastore.
        status: u16,
        /// Raw response body (or `(no body)`).
        body: String,
    },

    /// Transport-level failure talking to an upstream service.
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx record could not be turned into an event.
    #[error("{0} event could not be normalized")]
    Unnormalizable(&'static str),

    /// Cover URL does not use `http` or `https`.
    #[error("cover url is not http/https: {0}")]
    CoverInvalid(String),

    /// Cover URL did not answer with a success status.
    #[error("cover image is not reachable: HTTP {status} ({url})")]
    CoverUnreachable {
        /// Final status code of the check.
        status: String,
        /// Checked URL.
        url: String,
    },

    /// Cover URL answered, but not with image content.
    #[error("cover url is not an image: content-type=\"{content_type}\" ({url})")]
    CoverNotAnImage {
        /// Declared content type of the response.
        content_type: String,
        /// Checked URL.
        url: String,
        /// First bytes of the body, when one was read.
        snippet: Option<String>,
    },

    /// Write returned 2xx but the attachment field came back empty.
    #[error(
        "{mode} succeeded but the cover image was not attached; the datastore could not fetch the url"
    )]
    AttachmentNotPersisted {
        /// `"create"` or `"update"`.
        mode: &'static str,
    },

    /// Media host rejected an upload.
    #[error("media upload failed: {0}")]
    MediaUpload(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SiteError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Unauthorized => 2001,
            Self::NotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Configuration(_) => 3001,
            Self::Unnormalizable(_) => 3002,
            Self::CoverInvalid(_) => 4001,
            Self::CoverUnreachable { .. } => 4002,
            Self::CoverNotAnImage { .. } => 4003,
            Self::AttachmentNotPersisted { .. } => 4004,
            Self::StoreRequest { .. } => 5001,
            Self::Transport(_) => 5002,
            Self::MediaUpload(_) => 5003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Configuration(_) | Self::Unnormalizable(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::CoverInvalid(_)
            | Self::CoverUnreachable { .. }
            | Self::CoverNotAnImage { .. }
            | Self::AttachmentNotPersisted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StoreRequest { .. } | Self::Transport(_) | Self::MediaUpload(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Extra diagnostic text carried alongside the message, if any.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::CoverNotAnImage {
                snippet: Some(snippet),
                ..
            } => Some(format!("body starts with: {snippet:?}")),
            _ => None,
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
