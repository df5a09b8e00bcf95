//! REST client for the events and settings tables.
//!
//! [`StoreClient`] is the only code that talks to the datastore. Reads are
//! normalized through [`crate::domain::normalize`]; writes go through
//! [`super::fields`] and, when they set a cover, are checked afterwards
//! because a 2xx answer does not mean the datastore managed to fetch the
//! attachment.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::cache::CacheWindow;
use super::fields::{event_fields, settings_fields};
use super::record::{COVER_FIELD, DeletedRecord, RawRecord, RecordPage, WritePayload};
use crate::config::StoreConfig;
use crate::domain::normalize::{record_to_event, record_to_settings, records_to_events};
use crate::domain::settings::SettingsUpdate;
use crate::domain::upsert::{CoverChange, UpsertEventInput};
use crate::domain::{Event, EventId, GlobalSettings};
use crate::error::SiteError;
use crate::media::RemoteImageValidator;

/// Records requested per list page (the datastore maximum).
pub const PAGE_SIZE: u32 = 100;

/// Upper bound on pages fetched by one listing.
pub const MAX_PAGES: usize = 10;

/// Client for the datastore REST API.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    base_url: Url,
    token: String,
    events_table: String,
    globals_table: String,
    validator: RemoteImageValidator,
}

impl StoreClient {
    /// Builds a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Configuration`] when the token or base id is
    /// missing or the API URL is malformed, before any request is made.
    pub fn new(config: &StoreConfig, timeout: Duration) -> Result<Self, SiteError> {
        let token = config
            .api_token
            .clone()
            .ok_or_else(|| SiteError::Configuration("missing STORE_API_TOKEN".to_string()))?;
        let base_id = config
            .base_id
            .as_deref()
            .ok_or_else(|| SiteError::Configuration("missing STORE_BASE_ID".to_string()))?;

        let mut base_url = Url::parse(&config.api_url)
            .map_err(|e| SiteError::Configuration(format!("invalid STORE_API_URL: {e}")))?;
        base_url
            .path_segments_mut()
            .map_err(|()| SiteError::Configuration("STORE_API_URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(base_id);

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            token,
            events_table: config.events_table.clone(),
            globals_table: config.globals_table.clone(),
            validator: RemoteImageValidator::new(timeout)?,
        })
    }

    fn table_url(&self, table: &str, record_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }
        url
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SiteError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "datastore request failed");
            return Err(SiteError::StoreRequest {
                status: status.as_u16(),
                body: if body.is_empty() {
                    "(no body)".to_string()
                } else {
                    body
                },
            });
        }
        serde_json::from_str(&body)
            .map_err(|e| SiteError::Internal(format!("unexpected datastore response: {e}")))
    }

    /// Lists every valid event, newest start first as sorted by the datastore.
    ///
    /// Pages are fetched one after another, each using the cursor of the
    /// previous one, and stop after [`MAX_PAGES`]. Malformed records are
    /// dropped. `cache` is only passed along for the callers' caches.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::StoreRequest`] on a non-2xx page and
    /// [`SiteError::Transport`] on network failure.
    pub async fn list_events(&self, cache: CacheWindow) -> Result<Vec<Event>, SiteError> {
        let mut events = Vec::new();
        let mut offset: Option<String> = None;

        for page_number in 1..=MAX_PAGES {
            let mut url = self.table_url(&self.events_table, None);
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("pageSize", &PAGE_SIZE.to_string())
                    .append_pair("sort[0][field]", "dateStart")
                    .append_pair("sort[0][direction]", "desc");
                if let Some(cursor) = offset.as_deref() {
                    query.append_pair("offset", cursor);
                }
            }

            let page: RecordPage = self.send_json(self.http.get(url)).await?;
            let received = page.records.len();
            events.extend(records_to_events(&page.records));
            tracing::debug!(page_number, received, %cache, "fetched events page");

            offset = page.offset.filter(|o| !o.is_empty());
            if offset.is_none() {
                break;
            }
            if page_number == MAX_PAGES {
                tracing::warn!(max_pages = MAX_PAGES, "event listing truncated at page cap");
            }
        }

        Ok(events)
    }

    /// Finds an event by slug.
    ///
    /// Lists everything and scans, so cost grows with the table; fine at
    /// the size of an events calendar.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::list_events`].
    pub async fn get_event_by_slug(
        &self,
        slug: &str,
        cache: CacheWindow,
    ) -> Result<Option<Event>, SiteError> {
        let slug = slug.trim();
        Ok(self
            .list_events(cache)
            .await?
            .into_iter()
            .find(|e| e.slug == slug))
    }

    /// Creates an event record.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidRequest`] for unusable input, a cover
    /// check error, [`SiteError::StoreRequest`] on a non-2xx answer, and
    /// [`SiteError::AttachmentNotPersisted`] when the requested cover did
    /// not make it into the stored record.
    pub async fn create_event(&self, input: &UpsertEventInput) -> Result<Event, SiteError> {
        let payload = self.prepare_write(input).await?;
        tracing::info!(
            slug = %input.slug.trim(),
            cover_field = COVER_FIELD,
            sends_cover = input.cover != CoverChange::Unset,
            "creating event"
        );

        let request = self
            .http
            .post(self.table_url(&self.events_table, None))
            .json(&payload);
        let record: RawRecord = self.send_json(request).await?;
        finish_write(input, &record, "create")
    }

    /// Updates an existing event record by id.
    ///
    /// Same mapping and checks as [`StoreClient::create_event`]; a cover
    /// left [`CoverChange::Unset`] keeps whatever is stored.
    ///
    /// # Errors
    ///
    /// As for [`StoreClient::create_event`], plus
    /// [`SiteError::InvalidRequest`] for a blank id.
    pub async fn update_event_by_id(
        &self,
        id: &EventId,
        input: &UpsertEventInput,
    ) -> Result<Event, SiteError> {
        let id = require_id(id)?;
        let payload = self.prepare_write(input).await?;
        tracing::info!(
            record_id = id,
            slug = %input.slug.trim(),
            cover_field = COVER_FIELD,
            sends_cover = input.cover != CoverChange::Unset,
            "updating event"
        );

        let request = self
            .http
            .patch(self.table_url(&self.events_table, Some(id)))
            .json(&payload);
        let record: RawRecord = self.send_json(request).await?;
        tracing::debug!(
            record_id = id,
            returned_cover = record.attachments(COVER_FIELD).map_or(0, Vec::len),
            "event updated"
        );
        finish_write(input, &record, "update")
    }

    /// Deletes an event record by id.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidRequest`] for a blank id and
    /// [`SiteError::StoreRequest`] on a non-2xx answer.
    pub async fn delete_event_by_id(&self, id: &EventId) -> Result<EventId, SiteError> {
        let id = require_id(id)?;
        let request = self.http.delete(self.table_url(&self.events_table, Some(id)));
        let deleted: DeletedRecord = self.send_json(request).await?;
        tracing::info!(record_id = %deleted.id, deleted = deleted.deleted, "event deleted");
        Ok(EventId::new(deleted.id))
    }

    async fn settings_record(&self) -> Result<Option<RawRecord>, SiteError> {
        let mut url = self.table_url(&self.globals_table, None);
        url.query_pairs_mut().append_pair("maxRecords", "1");
        let page: RecordPage = self.send_json(self.http.get(url)).await?;
        Ok(page.records.into_iter().next())
    }

    /// Reads the settings singleton, with defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::StoreRequest`] on a non-2xx answer.
    pub async fn get_settings(&self, cache: CacheWindow) -> Result<GlobalSettings, SiteError> {
        let record = self.settings_record().await?;
        tracing::debug!(found = record.is_some(), %cache, "fetched settings");
        Ok(record_to_settings(record.as_ref()))
    }

    /// Applies `update` to the settings singleton, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::StoreRequest`] on a non-2xx answer.
    pub async fn update_settings(
        &self,
        update: &SettingsUpdate,
    ) -> Result<GlobalSettings, SiteError> {
        let current = self.settings_record().await?;
        let next = update.apply(&record_to_settings(current.as_ref()));
        let payload = WritePayload::new(settings_fields(&next));

        let request = match current.as_ref().filter(|r| !r.id.is_empty()) {
            Some(record) => self
                .http
                .patch(self.table_url(&self.globals_table, Some(&record.id))),
            None => self.http.post(self.table_url(&self.globals_table, None)),
        };
        let saved: RawRecord = self.send_json(request.json(&payload)).await?;
        tracing::info!(record_id = %saved.id, "settings saved");
        Ok(record_to_settings(Some(&saved)))
    }

    async fn prepare_write(&self, input: &UpsertEventInput) -> Result<WritePayload, SiteError> {
        let fields = event_fields(input)?;
        if let Some(url) = input.cover.url() {
            self.validator.validate(url).await?;
        }
        Ok(WritePayload::new(fields))
    }
}

fn require_id(id: &EventId) -> Result<&str, SiteError> {
    let id = id.as_str().trim();
    if id.is_empty() {
        return Err(SiteError::InvalidRequest("missing record id".to_string()));
    }
    Ok(id)
}

/// Verifies a requested cover was stored, then normalizes the record.
fn finish_write(
    input: &UpsertEventInput,
    record: &RawRecord,
    mode: &'static str,
) -> Result<Event, SiteError> {
    if input.cover.url().is_some() {
        let attached = record
            .attachments(COVER_FIELD)
            .is_some_and(|list| !list.is_empty());
        if !attached {
            tracing::warn!(record_id = %record.id, mode, "cover attachment missing after write");
            return Err(SiteError::AttachmentNotPersisted { mode });
        }
    }
    record_to_event(record).ok_or(SiteError::Unnormalizable(mode))
}
