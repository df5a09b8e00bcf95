//! Admin event DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::upsert::{CoverChange, UpsertEventInput};
use crate::domain::{EventId, EventStatus};

/// Request body for `POST /admin/events` and `PUT /admin/events/{id}`.
///
/// `coverUrl` has three meanings: omitted leaves the stored cover alone,
/// `""` or `null` removes it, a URL replaces it.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminEventPayload {
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Lifecycle state.
    pub status: EventStatus,
    /// Start (ISO 8601 or `YYYY-MM-DDTHH:MM`).
    #[serde(default)]
    pub date_start: String,
    /// Optional end.
    #[serde(default)]
    pub date_end: Option<String>,
    /// City name.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Country code; blank means `MX`.
    #[serde(default)]
    pub country: Option<String>,
    /// Venue name.
    #[serde(default)]
    pub venue: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Event-specific ticket link.
    #[serde(default)]
    pub ticket_url: Option<String>,
    /// Announcement post link.
    #[serde(default)]
    pub instagram_post_url: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Cover change.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub cover_url: CoverChange,
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<AdminEventPayload> for UpsertEventInput {
    fn from(payload: AdminEventPayload) -> Self {
        Self {
            slug: payload.slug,
            title: payload.title,
            status: payload.status,
            date_start: payload.date_start,
            date_end: optional(payload.date_end),
            city: optional(payload.city),
            state: optional(payload.state),
            country: optional(payload.country),
            venue: optional(payload.venue),
            address: optional(payload.address),
            ticket_url: optional(payload.ticket_url),
            instagram_post_url: optional(payload.instagram_post_url),
            description: optional(payload.description),
            cover: payload.cover_url,
        }
    }
}

/// Response body for `DELETE /admin/events/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteEventResponse {
    /// Removed record id.
    pub id: EventId,
    /// Always `true` on success.
    pub deleted: bool,
}
