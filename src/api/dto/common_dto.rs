//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for `POST /admin/uploads`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadParams {
    /// Original file name. Defaults to `cover.jpg`.
    #[serde(default = "default_filename")]
    pub filename: String,
}

/// Response body for `POST /admin/uploads`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Public URL of the uploaded image, ready to use as `coverUrl`.
    pub secure_url: String,
}

fn default_filename() -> String {
    "cover.jpg".to_string()
}
