//! Public read endpoints: home, events, event detail, about.
//!
//! These never fail because the datastore is down; they answer with empty
//! lists and default settings instead. Every response advertises the
//! configured cache window.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::app_state::AppState;
use crate::domain::ordering::GroupedEvents;
use crate::error::{ErrorResponse, SiteError};
use crate::service::views::{AboutView, EventDetailView, HomeView};

fn cache_header(state: &AppState) -> [(header::HeaderName, String); 1] {
    [(
        header::CACHE_CONTROL,
        state.site_service.cache_window().cache_control(),
    )]
}

/// `GET /home`: Home page data.
#[utoipa::path(
    get,
    path = "/api/v1/home",
    tag = "Public",
    summary = "Home page",
    description = "Settings, events newest first, the next upcoming event, and the resolved tickets call-to-action.",
    responses(
        (status = 200, description = "Home page data", body = HomeView),
    )
)]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let view = state.site_service.home(Utc::now()).await;
    (cache_header(&state), Json(view))
}

/// `GET /events`: Events grouped by status.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Public",
    summary = "List events",
    description = "Upcoming events soonest first, then past and cancelled events most recent first.",
    responses(
        (status = 200, description = "Grouped events", body = GroupedEvents),
    )
)]
pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    let grouped = state.site_service.events_page().await;
    (cache_header(&state), Json(grouped))
}

/// `GET /events/{slug}`: Event detail.
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] if no event has the slug.
#[utoipa::path(
    get,
    path = "/api/v1/events/{slug}",
    tag = "Public",
    summary = "Event detail",
    description = "A single event with its resolved ticket link and location line.",
    params(
        ("slug" = String, Path, description = "Event slug"),
    ),
    responses(
        (status = 200, description = "Event detail", body = EventDetailView),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn event_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, SiteError> {
    let view = state.site_service.event_detail(&slug).await?;
    Ok((cache_header(&state), Json(view)))
}

/// `GET /about`: About page data.
#[utoipa::path(
    get,
    path = "/api/v1/about",
    tag = "Public",
    summary = "About page",
    responses(
        (status = 200, description = "About page data", body = AboutView),
    )
)]
pub async fn about(State(state): State<AppState>) -> impl IntoResponse {
    let view = state.site_service.about().await;
    (cache_header(&state), Json(view))
}

/// Public routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/events", get(list_events))
        .route("/events/{slug}", get(event_detail))
        .route("/about", get(about))
}
