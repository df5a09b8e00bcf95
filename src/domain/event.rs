//! The event entity as the rest of the site sees it.
//!
//! An [`Event`] is always fully validated: the normalizer in
//! [`super::normalize`] is the only place that builds one from datastore
//! data, and it refuses records without a slug, title, or start date.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Country assumed when a record does not name one.
pub const DEFAULT_COUNTRY: &str = "MX";

/// Opaque record identifier assigned by the datastore.
///
/// Immutable once assigned; the site never generates one itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wraps a datastore record id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Lifecycle state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Scheduled and not yet held.
    Upcoming,
    /// Already held.
    Past,
    /// Called off.
    Cancelled,
}

impl EventStatus {
    /// Returns the wire name used by the datastore.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Past => "past",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a loosely-typed status, falling back to [`EventStatus::Past`].
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Past)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "past" => Ok(Self::Past),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown event status: {other}")),
        }
    }
}

/// A validated event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Datastore record id.
    pub id: EventId,
    /// URL slug. Uniqueness is by operator convention only.
    pub slug: String,
    /// Display title, never empty.
    pub title: String,
    /// Lifecycle state.
    pub status: EventStatus,
    /// Start instant.
    pub date_start: DateTime<Utc>,
    /// End instant, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<DateTime<Utc>>,
    /// City name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Country code; [`DEFAULT_COUNTRY`] when the record has none.
    pub country: String,
    /// Venue name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Event-specific ticket link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    /// Link to the announcement post.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_post_url: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cover image URL derived from the first attachment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

impl Event {
    /// Whether the event is still ahead.
    #[must_use]
    pub fn is_upcoming(&self) -> bool {
        self.status == EventStatus::Upcoming
    }

    /// Joins city, state, and country, skipping blanks.
    #[must_use]
    pub fn location_line(&self) -> String {
        [
            self.city.as_deref(),
            self.state.as_deref(),
            Some(self.country.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}
