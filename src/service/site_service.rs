//! Site service: public page views and gated admin operations.

use chrono::{DateTime, Utc};

use super::admin_guard::AdminGuard;
use super::views::{AboutView, EventDetailView, HomeView};
use crate::domain::ordering::{GroupedEvents, sort_newest_first};
use crate::domain::settings::SettingsUpdate;
use crate::domain::ticket::{
    effective_tickets_url, pick_closest_upcoming, primary_cta, resolve_ticket_url,
};
use crate::domain::upsert::UpsertEventInput;
use crate::domain::{Event, EventId, GlobalSettings};
use crate::error::SiteError;
use crate::media::MediaUploader;
use crate::store::{CacheWindow, StoreClient};

/// Orchestration layer between HTTP handlers and the datastore.
///
/// Public reads never fail on datastore trouble: they log and fall back
/// to empty lists and default settings. Admin operations check the
/// password first and surface every error.
#[derive(Debug, Clone)]
pub struct SiteService {
    store: StoreClient,
    guard: AdminGuard,
    uploader: Option<MediaUploader>,
    cache: CacheWindow,
}

impl SiteService {
    /// Creates a new `SiteService`.
    #[must_use]
    pub fn new(
        store: StoreClient,
        guard: AdminGuard,
        uploader: Option<MediaUploader>,
        cache: CacheWindow,
    ) -> Self {
        Self {
            store,
            guard,
            uploader,
            cache,
        }
    }


    /// Cache window applied to public reads.
    #[must_use]
    pub const fn cache_window(&self) -> CacheWindow {
        self.cache
    }

    async fn events_or_empty(&self) -> Vec<Event> {
        self.store
            .list_events(self.cache)
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "event listing unavailable, rendering empty");
                Vec::new()
            })
    }

    async fn settings_or_default(&self) -> GlobalSettings {
        self.store
            .get_settings(self.cache)
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "settings unavailable, using defaults");
                GlobalSettings::default()
            })
    }

    /// Builds the home page as of `now`.
    pub async fn home(&self, now: DateTime<Utc>) -> HomeView {
        let settings = self.settings_or_default().await;
        let mut events = self.events_or_empty().await;
        sort_newest_first(&mut events);

        let closest_upcoming = pick_closest_upcoming(&events, now).cloned();
        let tickets_url = effective_tickets_url(&settings, closest_upcoming.as_ref());
        let primary_cta = primary_cta(&settings, &tickets_url);

        HomeView {
            settings,
            events,
            closest_upcoming,
            tickets_url,
            primary_cta,
        }
    }

    /// Events grouped by status for the listing page.
    pub async fn events_page(&self) -> GroupedEvents {
        GroupedEvents::from_events(self.events_or_empty().await)
    }

    /// A single event page.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] when no event has `slug`, including
    /// when the datastore is unavailable.
    pub async fn event_detail(&self, slug: &str) -> Result<EventDetailView, SiteError> {
        let event = match self.store.get_event_by_slug(slug, self.cache).await {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(slug, error = %err, "event lookup unavailable");
                None
            }
        }
        .ok_or_else(|| SiteError::NotFound(format!("event {slug}")))?;

        let settings = self.settings_or_default().await;
        let ticket_url = resolve_ticket_url(
            event.ticket_url.as_deref(),
            Some(settings.tickets_cta_url.as_str()),
        );
        Ok(EventDetailView {
            location: event.location_line(),
            ticket_url,
            brand: settings.brand,
            event,
        })
    }

    /// The about page.
    pub async fn about(&self) -> AboutView {
        let settings = self.settings_or_default().await;
        AboutView {
            brand: settings.brand,
            instagram_url: settings.instagram_url,
        }
    }

    /// Checks the admin password without touching the datastore.
    ///
    /// Handlers call this before reading the request body.
    ///
    /// # Errors
    ///
    /// Returns the guard's error.
    pub fn authorize(&self, password: Option<&str>) -> Result<(), SiteError> {
        self.guard.check(password)
    }

    /// Lists all events without reuse.
    ///
    /// # Errors
    ///
    /// Returns the guard's error, or any datastore error.
    pub async fn admin_list_events(&self, password: Option<&str>) -> Result<Vec<Event>, SiteError> {
        self.guard.check(password)?;
        self.store.list_events(CacheWindow::NONE).await
    }

    /// Creates an event.
    ///
    /// # Errors
    ///
    /// Returns the guard's error, or any error of
    /// [`StoreClient::create_event`].
    pub async fn admin_create_event(
        &self,
        password: Option<&str>,
        input: &UpsertEventInput,
    ) -> Result<Event, SiteError> {
        self.guard.check(password)?;
        let created = self.store.create_event(input).await?;
        tracing::info!(record_id = %created.id, slug = %created.slug, "admin created event");
        Ok(created)
    }

    /// Updates an event by id.
    ///
    /// # Errors
    ///
    /// Returns the guard's error, or any error of
    /// [`StoreClient::update_event_by_id`].
    pub async fn admin_update_event(
        &self,
        password: Option<&str>,
        id: &EventId,
        input: &UpsertEventInput,
    ) -> Result<Event, SiteError> {
        self.guard.check(password)?;
        let updated = self.store.update_event_by_id(id, input).await?;
        tracing::info!(record_id = %updated.id, slug = %updated.slug, "admin updated event");
        Ok(updated)
    }

    /// Deletes an event by id.
    ///
    /// # Errors
    ///
    /// Returns the guard's error, or any datastore error.
    pub async fn admin_delete_event(
        &self,
        password: Option<&str>,
        id: &EventId,
    ) -> Result<EventId, SiteError> {
        self.guard.check(password)?;
        self.store.delete_event_by_id(id).await
    }

    /// Reads the stored settings.
    ///
    /// # Errors
    ///
    /// Returns the guard's error, or any datastore error.
    pub async fn admin_get_settings(
        &self,
        password: Option<&str>,
    ) -> Result<GlobalSettings, SiteError> {
        self.guard.check(password)?;
        self.store.get_settings(CacheWindow::NONE).await
    }

    /// Saves a settings change.
    ///
    /// # Errors
    ///
    /// Returns the guard's error, or any datastore error.
    pub async fn admin_update_settings(
        &self,
        password: Option<&str>,
        update: &SettingsUpdate,
    ) -> Result<GlobalSettings, SiteError> {
        self.guard.check(password)?;
        self.store.update_settings(update).await
    }

    /// Uploads an image to the media host and returns its public URL.
    ///
    /// # Errors
    ///
    /// Returns the guard's error, [`SiteError::Configuration`] when uploads
    /// are not configured, or any upload error.
    pub async fn admin_upload_image(
        &self,
        password: Option<&str>,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<String, SiteError> {
        self.guard.check(password)?;
        let uploader = self.uploader.as_ref().ok_or_else(|| {
            SiteError::Configuration("missing MEDIA_CLOUD_NAME or MEDIA_UPLOAD_PRESET".to_string())
        })?;
        uploader.upload(bytes, filename, content_type).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::EventStatus;
    use crate::test_support::{FakeStore, event_record, store_config};
    use serde_json::json;
    use std::time::Duration;

    const PASSWORD: &str = "letmein";

    fn service(base: &str) -> SiteService {
        let Ok(store) = StoreClient::new(&store_config(base), Duration::from_secs(5)) else {
            panic!("client builds");
        };
        SiteService::new(
            store,
            AdminGuard::new(Some(PASSWORD.to_string())),
            None,
            CacheWindow::seconds(60),
        )
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-18T12:00:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default()
    }

    fn ticketed(mut record: serde_json::Value, url: &str) -> serde_json::Value {
        record["fields"]["ticketUrl"] = json!(url);
        record
    }

    #[tokio::test]
    async fn home_uses_closest_upcoming_link_without_override() {
        let store = FakeStore::with_pages(vec![vec![
            ticketed(
                event_record("rec1", "later", "upcoming", "2026-12-20T22:00:00Z", None),
                "https://t.example/later",
            ),
            ticketed(
                event_record("rec2", "next", "upcoming", "2026-11-01T22:00:00Z", None),
                "https://t.example/next",
            ),
            event_record("rec3", "old", "past", "2025-05-01T22:00:00Z", None),
        ]]);
        let base = store.start().await;

        let home = service(&base).home(now()).await;
        assert_eq!(home.events.len(), 3);
        assert_eq!(home.events.first().map(|e| e.slug.as_str()), Some("later"));
        assert_eq!(
            home.closest_upcoming.map(|e| e.slug),
            Some("next".to_string())
        );
        assert_eq!(home.tickets_url, "https://t.example/next");
        assert_eq!(home.primary_cta.label, "TICKETS");
    }

    #[tokio::test]
    async fn home_override_wins() {
        let store = FakeStore::with_pages(vec![vec![ticketed(
            event_record("rec2", "next", "upcoming", "2026-11-01T22:00:00Z", None),
            "https://t.example/next",
        )]]);
        store.state().globals = vec![json!({
            "id": "recG",
            "fields": { "ticketsCtaUrl": "https://global.example/all" }
        })];
        let base = store.start().await;

        let home = service(&base).home(now()).await;
        assert_eq!(home.tickets_url, "https://global.example/all");
        assert_eq!(home.primary_cta.href, "https://global.example/all");
    }

    #[tokio::test]
    async fn public_reads_tolerate_store_failure() {
        let store = FakeStore::default();
        store.state().fail_with = Some(500);
        let base = store.start().await;
        let service = service(&base);

        let home = service.home(now()).await;
        assert!(home.events.is_empty());
        assert_eq!(home.settings, GlobalSettings::default());
        assert_eq!(home.primary_cta.label, "FOLLOW / DM (IG)");

        assert!(service.events_page().await.is_empty());
        assert!(matches!(
            service.event_detail("anything").await,
            Err(SiteError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn detail_resolves_event_link_before_fallback() {
        let store = FakeStore::with_pages(vec![vec![
            ticketed(
                event_record("rec1", "own-link", "upcoming", "2026-11-01T22:00:00Z", None),
                "https://t.example/own",
            ),
            ticketed(
                event_record("rec2", "ftp-link", "upcoming", "2026-11-02T22:00:00Z", None),
                "ftp://nope",
            ),
        ]]);
        store.state().globals = vec![json!({
            "id": "recG",
            "fields": { "ticketsCtaUrl": "https://global.example/all" }
        })];
        let base = store.start().await;
        let service = service(&base);

        let Ok(own) = service.event_detail("own-link").await else {
            panic!("event found");
        };
        assert_eq!(own.ticket_url, "https://t.example/own");
        assert_eq!(own.location, "MX");

        let Ok(fallback) = service.event_detail("ftp-link").await else {
            panic!("event found");
        };
        assert_eq!(fallback.ticket_url, "https://global.example/all");
    }

    #[tokio::test]
    async fn admin_calls_are_gated_before_store_access() {
        let store = FakeStore::default();
        let base = store.start().await;
        let service = service(&base);
        let input =
            UpsertEventInput::new("x", "X", EventStatus::Upcoming, "2026-11-01T22:00:00Z");

        assert!(matches!(
            service.admin_list_events(Some("nope")).await,
            Err(SiteError::Unauthorized)
        ));
        assert!(matches!(
            service.admin_create_event(None, &input).await,
            Err(SiteError::Unauthorized)
        ));
        assert!(matches!(
            service
                .admin_delete_event(Some("wrong"), &EventId::from("rec1"))
                .await,
            Err(SiteError::Unauthorized)
        ));
        assert!(store.requests().is_empty());

        assert!(service.admin_list_events(Some(PASSWORD)).await.is_ok());
        assert_eq!(store.requests().len(), 1);
    }

    #[tokio::test]
    async fn upload_without_media_config_is_a_configuration_error() {
        let store = FakeStore::default();
        let base = store.start().await;
        let result = service(&base)
            .admin_upload_image(Some(PASSWORD), vec![1, 2], "a.jpg", "image/jpeg")
            .await;
        assert!(matches!(result, Err(SiteError::Configuration(_))));
    }
}
