//! Datastore record → [`Event`] normalization.
//!
//! Total function: a malformed record yields `None`, never an error and
//! never a partially-filled event. Listing relies on this to drop bad rows
//! without failing the whole page.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::event::{DEFAULT_COUNTRY, Event, EventId, EventStatus};
use super::settings::GlobalSettings;
use crate::store::record::{COVER_FIELD, RawRecord};

/// Naive timestamp layouts accepted after RFC 3339, tried in order.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses a timestamp the way a form or the datastore may hand it over.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS[.fff]]` and `YYYY-MM-DD`.
/// Values without an offset are taken as UTC.
#[must_use]
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Resolves the preferred URL of one attachment descriptor.
///
/// Large thumbnail first, then the original file URL.
fn attachment_url(attachment: &Value) -> Option<String> {
    let thumbnail = attachment
        .pointer("/thumbnails/large/url")
        .and_then(Value::as_str);
    let original = attachment.get("url").and_then(Value::as_str);
    [thumbnail, original]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

/// Derives the cover URL from the first element of the cover attachment list.
#[must_use]
pub fn cover_url(record: &RawRecord) -> Option<String> {
    record
        .attachments(COVER_FIELD)
        .and_then(|list| list.first())
        .and_then(attachment_url)
}

/// Converts a raw record into an [`Event`], or `None` if it is not one.
///
/// A record needs a non-empty slug, a non-empty title, and a parseable
/// `dateStart`. Status falls back to `past` when missing or unknown.
#[must_use]
pub fn record_to_event(record: &RawRecord) -> Option<Event> {
    let status = record
        .text("status")
        .map_or(EventStatus::Past, |s| EventStatus::parse_lenient(&s));
    let date_start = record.text("dateStart").and_then(|s| parse_instant(&s));
    let cover_url = cover_url(record);

    let slug = record.text("slug")?;
    let title = record.text("title")?;
    let date_start = date_start?;

    Some(Event {
        id: EventId::new(record.id.clone()),
        slug,
        title,
        status,
        date_start,
        date_end: record.text("dateEnd").and_then(|s| parse_instant(&s)),
        city: record.text("city"),
        state: record.text("state"),
        country: record
            .text("country")
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        venue: record.text("venue"),
        address: record.text("address"),
        ticket_url: record.text("ticketUrl"),
        instagram_post_url: record.text("instagramPostUrl"),
        description: record.text("description"),
        cover_url,
    })
}

/// Normalizes a page of records, silently dropping the malformed ones.
pub fn records_to_events<'a>(records: impl IntoIterator<Item = &'a RawRecord>) -> Vec<Event> {
    records
        .into_iter()
        .filter_map(|record| {
            let event = record_to_event(record);
            if event.is_none() {
                tracing::debug!(record_id = %record.id, "skipping malformed event record");
            }
            event
        })
        .collect()
}

/// Reads the settings singleton, filling gaps from the defaults.
#[must_use]
pub fn record_to_settings(record: Option<&RawRecord>) -> GlobalSettings {
    let defaults = GlobalSettings::default();
    let Some(record) = record else {
        return defaults;
    };
    GlobalSettings {
        brand: record.text("brand").unwrap_or(defaults.brand),
        instagram_url: record
            .text("instagramUrl")
            .unwrap_or(defaults.instagram_url),
        tickets_cta_url: record
            .text("ticketsCtaUrl")
            .unwrap_or(defaults.tickets_cta_url),
        tickets_cta_text: record
            .text("ticketsCtaText")
            .unwrap_or(defaults.tickets_cta_text),
        events_cta_text: defaults.events_cta_text,
    }
}
