//! Admin endpoints, all gated by the `x-admin-password` header.

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::dto::{AdminEventPayload, DeleteEventResponse, UploadParams, UploadResponse};
use crate::app_state::AppState;
use crate::domain::settings::SettingsUpdate;
use crate::domain::upsert::UpsertEventInput;
use crate::domain::{Event, EventId, GlobalSettings};
use crate::error::{ErrorResponse, SiteError};

/// Header carrying the admin password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Largest image accepted by the upload route.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn password(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
}

/// Authorizes first, then unwraps the body, so a bad password never
/// reaches deserialization errors.
fn authorized_body<T>(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, SiteError> {
    state.site_service.authorize(password(headers))?;
    let Json(value) = body.map_err(|e| SiteError::InvalidRequest(e.body_text()))?;
    Ok(value)
}

/// `GET /admin/events`: List every event, uncached.
///
/// # Errors
///
/// Returns [`SiteError`] on a bad password or datastore failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/events",
    tag = "Admin",
    summary = "List events (admin)",
    params(("x-admin-password" = String, Header, description = "Admin password")),
    responses(
        (status = 200, description = "All valid events", body = Vec<Event>),
        (status = 401, description = "Bad password", body = ErrorResponse),
        (status = 502, description = "Datastore failure", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, SiteError> {
    let events = state
        .site_service
        .admin_list_events(password(&headers))
        .await?;
    Ok(Json(events))
}

/// `POST /admin/events`: Create an event.
///
/// # Errors
///
/// Returns [`SiteError`] on a bad password, invalid input, cover check
/// failure, or datastore failure.
#[utoipa::path(
    post,
    path = "/api/v1/admin/events",
    tag = "Admin",
    summary = "Create an event",
    description = "Creates an event record. A `coverUrl` is checked first and checked again after the write.",
    params(("x-admin-password" = String, Header, description = "Admin password")),
    request_body = AdminEventPayload,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Bad password", body = ErrorResponse),
        (status = 422, description = "Cover image rejected", body = ErrorResponse),
        (status = 502, description = "Datastore failure", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AdminEventPayload>, JsonRejection>,
) -> Result<impl IntoResponse, SiteError> {
    let input = UpsertEventInput::from(authorized_body(&state, &headers, payload)?);
    let created = state
        .site_service
        .admin_create_event(password(&headers), &input)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /admin/events/{id}`: Update an event.
///
/// # Errors
///
/// Returns [`SiteError`] on a bad password, invalid input, cover check
/// failure, or datastore failure.
#[utoipa::path(
    put,
    path = "/api/v1/admin/events/{id}",
    tag = "Admin",
    summary = "Update an event",
    description = "Updates an event record. Omitting `coverUrl` keeps the stored cover.",
    params(
        ("id" = String, Path, description = "Record id"),
        ("x-admin-password" = String, Header, description = "Admin password"),
    ),
    request_body = AdminEventPayload,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Bad password", body = ErrorResponse),
        (status = 422, description = "Cover image rejected", body = ErrorResponse),
        (status = 502, description = "Datastore failure", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<AdminEventPayload>, JsonRejection>,
) -> Result<impl IntoResponse, SiteError> {
    let input = UpsertEventInput::from(authorized_body(&state, &headers, payload)?);
    let updated = state
        .site_service
        .admin_update_event(password(&headers), &EventId::new(id), &input)
        .await?;
    Ok(Json(updated))
}

/// `DELETE /admin/events/{id}`: Delete an event.
///
/// # Errors
///
/// Returns [`SiteError`] on a bad password or datastore failure.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/events/{id}",
    tag = "Admin",
    summary = "Delete an event",
    params(
        ("id" = String, Path, description = "Record id"),
        ("x-admin-password" = String, Header, description = "Admin password"),
    ),
    responses(
        (status = 200, description = "Event deleted", body = DeleteEventResponse),
        (status = 401, description = "Bad password", body = ErrorResponse),
        (status = 502, description = "Datastore failure", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, SiteError> {
    let id = state
        .site_service
        .admin_delete_event(password(&headers), &EventId::new(id))
        .await?;
    Ok(Json(DeleteEventResponse { id, deleted: true }))
}

/// `GET /admin/settings`: Read site settings.
///
/// # Errors
///
/// Returns [`SiteError`] on a bad password or datastore failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/settings",
    tag = "Admin",
    summary = "Read settings",
    params(("x-admin-password" = String, Header, description = "Admin password")),
    responses(
        (status = 200, description = "Current settings", body = GlobalSettings),
        (status = 401, description = "Bad password", body = ErrorResponse),
    )
)]
pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, SiteError> {
    let settings = state
        .site_service
        .admin_get_settings(password(&headers))
        .await?;
    Ok(Json(settings))
}

/// `PUT /admin/settings`: Update site settings.
///
/// # Errors
///
/// Returns [`SiteError`] on a bad password or datastore failure.
#[utoipa::path(
    put,
    path = "/api/v1/admin/settings",
    tag = "Admin",
    summary = "Update settings",
    description = "Omitted fields keep their value; an empty `ticketsCtaUrl` removes the tickets override.",
    params(("x-admin-password" = String, Header, description = "Admin password")),
    request_body = SettingsUpdate,
    responses(
        (status = 200, description = "Saved settings", body = GlobalSettings),
        (status = 401, description = "Bad password", body = ErrorResponse),
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    update: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, SiteError> {
    let update = authorized_body(&state, &headers, update)?;
    let settings = state
        .site_service
        .admin_update_settings(password(&headers), &update)
        .await?;
    Ok(Json(settings))
}

/// `POST /admin/uploads`: Upload a cover image to the media host.
///
/// # Errors
///
/// Returns [`SiteError`] on a bad password, missing media configuration,
/// or a rejected upload.
#[utoipa::path(
    post,
    path = "/api/v1/admin/uploads",
    tag = "Admin",
    summary = "Upload an image",
    description = "Forwards the raw request body to the media host and returns the public URL.",
    params(
        UploadParams,
        ("x-admin-password" = String, Header, description = "Admin password"),
    ),
    request_body(content = Vec<u8>, content_type = "image/*"),
    responses(
        (status = 200, description = "Uploaded", body = UploadResponse),
        (status = 401, description = "Bad password", body = ErrorResponse),
        (status = 502, description = "Media host rejected the upload", body = ErrorResponse),
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<UploadParams>, QueryRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, SiteError> {
    state.site_service.authorize(password(&headers))?;
    let Query(params) = params.map_err(|e| SiteError::InvalidRequest(e.body_text()))?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");
    let secure_url = state
        .site_service
        .admin_upload_image(
            password(&headers),
            body.to_vec(),
            &params.filename,
            content_type,
        )
        .await?;
    Ok(Json(UploadResponse { secure_url }))
}

/// Admin routes, mounted under `/admin`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/events", get(list_events).post(create_event))
        .route("/admin/events/{id}", put(update_event).delete(delete_event))
        .route("/admin/settings", get(get_settings).put(update_settings))
        .route(
            "/admin/uploads",
            post(upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}
