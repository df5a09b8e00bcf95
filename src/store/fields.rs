//! Write-side field mapping.
//!
//! Turns an [`UpsertEventInput`] into the datastore's column names. Blank
//! optional values are omitted so the datastore never stores `""` for
//! them, and the cover attachment follows [`CoverChange`]:
//! `Unset` omits the key, `Clear` writes `[]`, `Set` writes one descriptor.

use chrono::SecondsFormat;
use serde_json::{Map, Value, json};

use super::record::COVER_FIELD;
use crate::domain::event::DEFAULT_COUNTRY;
use crate::domain::normalize::parse_instant;
use crate::domain::settings::GlobalSettings;
use crate::domain::upsert::{CoverChange, UpsertEventInput};
use crate::error::SiteError;

/// Filename the datastore gives a mirrored cover image.
const COVER_FILENAME: &str = "cover.jpg";

fn iso(field: &str, raw: &str) -> Result<String, SiteError> {
    parse_instant(raw)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| SiteError::InvalidRequest(format!("invalid {field}: {raw}")))
}

fn required(field: &str, value: &str) -> Result<Value, SiteError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SiteError::InvalidRequest(format!("missing {field}")));
    }
    Ok(Value::String(value.to_string()))
}

fn put_optional(fields: &mut Map<String, Value>, key: &str, value: Option<&String>) {
    if let Some(value) = value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
        fields.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// Encodes the cover change, or `None` when the key must be left out.
#[must_use]
pub fn cover_value(cover: &CoverChange) -> Option<Value> {
    match cover {
        CoverChange::Unset => None,
        CoverChange::Clear => Some(json!([])),
        CoverChange::Set(url) => Some(json!([{ "url": url, "filename": COVER_FILENAME }])),
    }
}

/// Maps an event input onto datastore fields.
///
/// # Errors
///
/// Returns [`SiteError::InvalidRequest`] when slug or title is blank or a
/// date cannot be parsed.
pub fn event_fields(input: &UpsertEventInput) -> Result<Map<String, Value>, SiteError> {
    let mut fields = Map::new();
    fields.insert("slug".to_string(), required("slug", &input.slug)?);
    fields.insert("title".to_string(), required("title", &input.title)?);
    fields.insert(
        "status".to_string(),
        Value::String(input.status.as_str().to_string()),
    );
    fields.insert(
        "dateStart".to_string(),
        Value::String(iso("dateStart", &input.date_start)?),
    );
    if let Some(end) = input.date_end.as_deref().filter(|d| !d.trim().is_empty()) {
        fields.insert("dateEnd".to_string(), Value::String(iso("dateEnd", end)?));
    }

    put_optional(&mut fields, "city", input.city.as_ref());
    put_optional(&mut fields, "state", input.state.as_ref());
    let country = input
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_COUNTRY);
    fields.insert("country".to_string(), Value::String(country.to_string()));
    put_optional(&mut fields, "venue", input.venue.as_ref());
    put_optional(&mut fields, "address", input.address.as_ref());
    put_optional(&mut fields, "ticketUrl", input.ticket_url.as_ref());
    put_optional(
        &mut fields,
        "instagramPostUrl",
        input.instagram_post_url.as_ref(),
    );
    put_optional(&mut fields, "description", input.description.as_ref());

    if let Some(cover) = cover_value(&input.cover) {
        fields.insert(COVER_FIELD.to_string(), cover);
    }
    Ok(fields)
}

/// Maps settings onto the singleton record's fields.
///
/// Every field is written, including an empty tickets URL.
#[must_use]
pub fn settings_fields(settings: &GlobalSettings) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("brand".to_string(), json!(settings.brand));
    fields.insert("instagramUrl".to_string(), json!(settings.instagram_url));
    fields.insert("ticketsCtaUrl".to_string(), json!(settings.tickets_cta_url));
    fields.insert(
        "ticketsCtaText".to_string(),
        json!(settings.tickets_cta_text),
    );
    fields
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::EventStatus;

    fn input(cover: CoverChange) -> UpsertEventInput {
        let mut input = UpsertEventInput::new(
            " noche-cdmx ",
            " Noche ",
            EventStatus::Upcoming,
            "2026-11-14T22:00",
        );
        input.cover = cover;
        input
    }

    fn fields(cover: CoverChange) -> Map<String, Value> {
        let Ok(fields) = event_fields(&input(cover)) else {
            panic!("valid input");
        };
        fields
    }

    #[test]
    fn unset_cover_omits_key() {
        assert!(!fields(CoverChange::Unset).contains_key(COVER_FIELD));
    }

    #[test]
    fn clear_cover_writes_empty_list() {
        assert_eq!(
            fields(CoverChange::Clear).get(COVER_FIELD),
            Some(&json!([]))
        );
    }

    #[test]
    fn set_cover_writes_single_descriptor() {
        let fields = fields(CoverChange::Set("https://x/img.jpg".to_string()));
        assert_eq!(
            fields.get(COVER_FIELD),
            Some(&json!([{ "url": "https://x/img.jpg", "filename": "cover.jpg" }]))
        );
    }

    #[test]
    fn strings_are_trimmed_and_dates_iso() {
        let fields = fields(CoverChange::Unset);
        assert_eq!(fields.get("slug"), Some(&json!("noche-cdmx")));
        assert_eq!(fields.get("title"), Some(&json!("Noche")));
        assert_eq!(fields.get("status"), Some(&json!("upcoming")));
        assert_eq!(
            fields.get("dateStart"),
            Some(&json!("2026-11-14T22:00:00.000Z"))
        );
    }

    #[test]
    fn blank_optionals_are_omitted_and_country_defaults() {
        let mut input = input(CoverChange::Unset);
        input.venue = Some("   ".to_string());
        input.city = Some("Oaxaca ".to_string());
        input.country = Some(String::new());
        let Ok(fields) = event_fields(&input) else {
            panic!("valid input");
        };
        assert!(!fields.contains_key("venue"));
        assert!(!fields.contains_key("dateEnd"));
        assert_eq!(fields.get("city"), Some(&json!("Oaxaca")));
        assert_eq!(fields.get("country"), Some(&json!("MX")));
    }

    #[test]
    fn invalid_input_is_rejected() {
        let mut blank_slug = input(CoverChange::Unset);
        blank_slug.slug = "  ".to_string();
        assert!(matches!(
            event_fields(&blank_slug),
            Err(SiteError::InvalidRequest(_))
        ));

        let mut bad_date = input(CoverChange::Unset);
        bad_date.date_start = "soon".to_string();
        assert!(matches!(
            event_fields(&bad_date),
            Err(SiteError::InvalidRequest(_))
        ));
    }

    #[test]
    fn settings_write_empty_override() {
        let fields = settings_fields(&GlobalSettings::default());
        assert_eq!(fields.get("ticketsCtaUrl"), Some(&json!("")));
        assert_eq!(fields.get("ticketsCtaText"), Some(&json!("TICKETS")));
    }
}
