//! Write-side shape of an event.
//!
//! The cover image travels as a [`CoverChange`] so that "leave the
//! attachment alone" and "remove the attachment" are different values.
//! Partial updates depend on that distinction.

use serde::{Deserialize, Deserializer};

use super::event::EventStatus;

/// Requested change to the cover attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CoverChange {
    /// Do not touch the stored attachment.
    #[default]
    Unset,
    /// Remove the stored attachment.
    Clear,
    /// Replace the attachment with the image at this URL.
    Set(String),
}

impl CoverChange {
    /// Builds a change from an optional form value.
    ///
    /// `None` leaves the attachment alone, a blank string clears it, and
    /// anything else (trimmed) sets it.
    #[must_use]
    pub fn from_form(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None => Self::Unset,
            Some("") => Self::Clear,
            Some(url) => Self::Set(url.to_string()),
        }
    }

    /// The URL being set, if this change sets one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Set(url) => Some(url),
            Self::Unset | Self::Clear => None,
        }
    }
}

/// Present-but-null clears, absent is handled by `#[serde(default)]` on
/// the containing field.
impl<'de> Deserialize<'de> for CoverChange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(match value {
            None => Self::Clear,
            Some(url) => Self::from_form(Some(&url)),
        })
    }
}

/// Fields submitted when creating or updating an event.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertEventInput {
    /// URL slug.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Lifecycle state.
    pub status: EventStatus,
    /// Start, as ISO 8601 or a `datetime-local` form value.
    pub date_start: String,
    /// Optional end, same formats as `date_start`.
    pub date_end: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// State or region.
    pub state: Option<String>,
    /// Country code.
    pub country: Option<String>,
    /// Venue name.
    pub venue: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Event-specific ticket link.
    pub ticket_url: Option<String>,
    /// Announcement post link.
    pub instagram_post_url: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Cover attachment change.
    pub cover: CoverChange,
}

impl UpsertEventInput {
    /// Minimal input with every optional field unset.
    #[must_use]
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        status: EventStatus,
        date_start: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            status,
            date_start: date_start.into(),
            date_end: None,
            city: None,
            state: None,
            country: None,
            venue: None,
            address: None,
            ticket_url: None,
            instagram_post_url: None,
            description: None,
            cover: CoverChange::Unset,
        }
    }
}
