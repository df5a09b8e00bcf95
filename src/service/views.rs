//! Read models returned by the public pages.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ticket::CallToAction;
use crate::domain::{Event, GlobalSettings};

/// Everything the home page renders.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    /// Site settings (defaults when unavailable).
    pub settings: GlobalSettings,
    /// Events, most recent start first.
    pub events: Vec<Event>,
    /// The next upcoming event, if any.
    pub closest_upcoming: Option<Event>,
    /// Tickets link after applying the home-page priority; may be empty.
    pub tickets_url: String,
    /// Primary button.
    pub primary_cta: CallToAction,
}

/// An event page.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailView {
    /// The event.
    pub event: Event,
    /// Event link, else the global fallback, else empty.
    pub ticket_url: String,
    /// `city, state, country` with blanks skipped.
    pub location: String,
    /// Brand name for the page chrome.
    pub brand: String,
}

/// The about page.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AboutView {
    /// Brand name.
    pub brand: String,
    /// Instagram profile URL.
    pub instagram_url: String,
}
