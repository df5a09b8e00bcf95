//! Ticket call-to-action resolution.
//!
//! Two policies live here and are intentionally not merged:
//! [`resolve_ticket_url`] lets an event's own link beat the global
//! fallback, while [`effective_tickets_url`] (home page) lets the global
//! override beat every event.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::event::Event;
use super::settings::GlobalSettings;

/// Label shown when there is no tickets link to point at.
pub const FOLLOW_CTA_LABEL: &str = "FOLLOW / DM (IG)";

fn http_link(candidate: Option<&str>) -> Option<&str> {
    candidate
        .map(str::trim)
        .filter(|url| url.starts_with("http"))
}

/// Picks the event's link if it is an http(s) URL, else the fallback if
/// it is one, else `""`.
#[must_use]
pub fn resolve_ticket_url(event_url: Option<&str>, fallback_url: Option<&str>) -> String {
    http_link(event_url)
        .or_else(|| http_link(fallback_url))
        .unwrap_or_default()
        .to_string()
}

/// Chooses the upcoming event closest to `now`.
///
/// Prefers the earliest upcoming event starting at or after `now`; when
/// every upcoming event is already behind, the earliest one overall.
/// Equal start times keep store order.
#[must_use]
pub fn pick_closest_upcoming(events: &[Event], now: DateTime<Utc>) -> Option<&Event> {
    let mut upcoming: Vec<&Event> = events.iter().filter(|e| e.is_upcoming()).collect();
    upcoming.sort_by_key(|e| e.date_start);
    upcoming
        .iter()
        .find(|e| e.date_start >= now)
        .or_else(|| upcoming.first())
        .copied()
}

/// Home-page tickets link: global override, then the closest upcoming
/// event's link, then `""`.
#[must_use]
pub fn effective_tickets_url(settings: &GlobalSettings, closest: Option<&Event>) -> String {
    settings
        .tickets_override()
        .or_else(|| {
            closest
                .and_then(|e| e.ticket_url.as_deref())
                .map(str::trim)
                .filter(|url| !url.is_empty())
        })
        .unwrap_or_default()
        .to_string()
}

/// Primary button of the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CallToAction {
    /// Link target.
    pub href: String,
    /// Button label.
    pub label: String,
}

/// Tickets button when a link exists, otherwise a follow button.
#[must_use]
pub fn primary_cta(settings: &GlobalSettings, effective_url: &str) -> CallToAction {
    if effective_url.is_empty() {
        CallToAction {
            href: settings.instagram_url.clone(),
            label: FOLLOW_CTA_LABEL.to_string(),
        }
    } else {
        CallToAction {
            href: effective_url.to_string(),
            label: settings.tickets_cta_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventStatus;
    use crate::domain::event::tests::sample;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default()
    }

    #[test]
    fn resolver_returns_empty_without_links() {
        assert_eq!(resolve_ticket_url(Some(""), Some("")), "");
        assert_eq!(resolve_ticket_url(None, None), "");
    }

    #[test]
    fn resolver_ignores_non_http_event_link() {
        assert_eq!(
            resolve_ticket_url(Some("ftp://x"), Some("https://y")),
            "https://y"
        );
    }

    #[test]
    fn resolver_prefers_event_link() {
        assert_eq!(
            resolve_ticket_url(Some("https://a"), Some("https://b")),
            "https://a"
        );
    }

    #[test]
    fn closest_upcoming_prefers_future() {
        let events = vec![
            sample("later", EventStatus::Upcoming, "2026-12-20T22:00:00Z"),
            sample("stale", EventStatus::Upcoming, "2026-09-01T22:00:00Z"),
            sample("next", EventStatus::Upcoming, "2026-11-01T22:00:00Z"),
            sample("old", EventStatus::Past, "2026-10-30T22:00:00Z"),
        ];
        let now = at("2026-10-18T12:00:00Z");
        assert_eq!(
            pick_closest_upcoming(&events, now).map(|e| e.slug.as_str()),
            Some("next")
        );
    }

    #[test]
    fn closest_upcoming_falls_back_to_earliest() {
        let events = vec![
            sample("b", EventStatus::Upcoming, "2026-09-01T22:00:00Z"),
            sample("a", EventStatus::Upcoming, "2026-08-01T22:00:00Z"),
        ];
        let now = at("2026-10-18T12:00:00Z");
        assert_eq!(
            pick_closest_upcoming(&events, now).map(|e| e.slug.as_str()),
            Some("a")
        );
    }

    #[test]
    fn closest_upcoming_ties_keep_store_order() {
        let events = vec![
            sample("first", EventStatus::Upcoming, "2026-11-01T22:00:00Z"),
            sample("second", EventStatus::Upcoming, "2026-11-01T22:00:00Z"),
        ];
        let now = at("2026-10-18T12:00:00Z");
        assert_eq!(
            pick_closest_upcoming(&events, now).map(|e| e.slug.as_str()),
            Some("first")
        );
    }

    #[test]
    fn global_override_beats_event_link() {
        let mut event = sample("next", EventStatus::Upcoming, "2026-11-01T22:00:00Z");
        event.ticket_url = Some("https://event.tickets/next".to_string());
        let settings = GlobalSettings {
            tickets_cta_url: " https://global.tickets ".to_string(),
            ..GlobalSettings::default()
        };
        assert_eq!(
            effective_tickets_url(&settings, Some(&event)),
            "https://global.tickets"
        );

        let no_override = GlobalSettings::default();
        assert_eq!(
            effective_tickets_url(&no_override, Some(&event)),
            "https://event.tickets/next"
        );
        assert_eq!(effective_tickets_url(&no_override, None), "");
    }

    #[test]
    fn cta_switches_to_follow_without_link() {
        let settings = GlobalSettings::default();
        let follow = primary_cta(&settings, "");
        assert_eq!(follow.href, settings.instagram_url);
        assert_eq!(follow.label, FOLLOW_CTA_LABEL);

        let tickets = primary_cta(&settings, "https://t.example");
        assert_eq!(tickets.href, "https://t.example");
        assert_eq!(tickets.label, "TICKETS");
    }
}
