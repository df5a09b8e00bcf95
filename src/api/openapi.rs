//! OpenAPI document covering every REST endpoint.

use utoipa::OpenApi;

use super::dto::{AdminEventPayload, DeleteEventResponse, UploadResponse};
use super::handlers::{admin, public, system};
use crate::domain::ordering::GroupedEvents;
use crate::domain::settings::SettingsUpdate;
use crate::domain::ticket::CallToAction;
use crate::domain::{Event, EventStatus, GlobalSettings};
use crate::error::{ErrorBody, ErrorResponse};
use crate::service::views::{AboutView, EventDetailView, HomeView};

/// Generated API description, served by Swagger UI when enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Nomadisch Labs site API"),
    paths(
        system::health_handler,
        public::home,
        public::list_events,
        public::event_detail,
        public::about,
        admin::list_events,
        admin::create_event,
        admin::update_event,
        admin::delete_event,
        admin::get_settings,
        admin::update_settings,
        admin::upload_image,
    ),
    components(schemas(
        Event,
        EventStatus,
        GlobalSettings,
        SettingsUpdate,
        GroupedEvents,
        CallToAction,
        HomeView,
        EventDetailView,
        AboutView,
        AdminEventPayload,
        DeleteEventResponse,
        UploadResponse,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
    )),
    tags(
        (name = "Public", description = "Cached public page data"),
        (name = "Admin", description = "Password-gated event and settings management"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
