//! Helpers shared by the in-crate tests: a local HTTP server runner and an
//! in-memory stand-in for the datastore REST API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value, json};

use crate::config::StoreConfig;
use crate::store::record::COVER_FIELD;

/// Token the fake datastore accepts.
pub(crate) const TEST_TOKEN: &str = "test-token";

/// Serves `router` on an ephemeral local port and returns its base URL.
#[allow(clippy::panic)]
pub(crate) async fn serve(router: Router) -> String {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("test listener address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// Store settings pointing at a fake datastore served from `base`.
pub(crate) fn store_config(base: &str) -> StoreConfig {
    StoreConfig {
        api_token: Some(TEST_TOKEN.to_string()),
        base_id: Some("appTest".to_string()),
        api_url: format!("{base}/v0"),
        ..StoreConfig::default()
    }
}

/// JSON for one event record in datastore shape.
pub(crate) fn event_record(
    id: &str,
    slug: &str,
    status: &str,
    date_start: &str,
    cover: Option<&str>,
) -> Value {
    let mut fields = json!({
        "slug": slug,
        "title": slug.replace('-', " ").to_uppercase(),
        "status": status,
        "dateStart": date_start,
    });
    if let Some(url) = cover {
        fields[COVER_FIELD] = json!([{
            "id": "att1",
            "url": url,
            "filename": "cover.jpg",
            "thumbnails": { "large": { "url": format!("{url}?w=1000") } }
        }]);
    }
    json!({ "id": id, "createdTime": "2026-01-01T00:00:00.000Z", "fields": fields })
}

/// A request the fake datastore received.
#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub(crate) method: &'static str,
    pub(crate) table: String,
    pub(crate) record_id: Option<String>,
    pub(crate) query: HashMap<String, String>,
    pub(crate) body: Value,
}

/// Mutable state behind [`FakeStore`].
#[derive(Debug, Default)]
pub(crate) struct FakeState {
    /// Event records served per list page.
    pub(crate) pages: Vec<Vec<Value>>,
    /// Records of the settings table.
    pub(crate) globals: Vec<Value>,
    /// Answer writes with an empty cover list, as when the fetch failed.
    pub(crate) drop_cover: bool,
    /// Fail every datastore call with this status.
    pub(crate) fail_with: Option<u16>,
    /// Everything received so far.
    pub(crate) requests: Vec<Captured>,
}

/// In-memory datastore with the same URL layout as the real REST API,
/// plus a couple of image URLs for cover checks under `/img`.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeStore {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    pub(crate) fn with_pages(pages: Vec<Vec<Value>>) -> Self {
        let store = Self::default();
        store.state().pages = pages;
        store
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn requests(&self) -> Vec<Captured> {
        self.state().requests.clone()
    }

    /// Starts the fake and returns its base URL.
    pub(crate) async fn start(&self) -> String {
        let router = Router::new()
            .route("/v0/{base}/{table}", get(list_records).post(create_record))
            .route(
                "/v0/{base}/{table}/{id}",
                axum::routing::patch(update_record).delete(delete_record),
            )
            .route(
                "/img/cover.jpg",
                get(|| async { ([(header::CONTENT_TYPE, "image/jpeg")], vec![0xFF_u8, 0xD8]) }),
            )
            .route(
                "/img/page.html",
                get(|| async { ([(header::CONTENT_TYPE, "text/html")], "<html></html>") }),
            )
            .with_state(self.clone());
        serve(router).await
    }

    fn record(&self, captured: Captured) -> Result<(), Response> {
        let mut state = self.state();
        state.requests.push(captured);
        match state.fail_with {
            Some(code) => Err((
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                "{\"error\":{\"type\":\"SERVER_ERROR\"}}",
            )
                .into_response()),
            None => Ok(()),
        }
    }

    fn echo(&self, id: &str, body: &Value) -> Value {
        let drop_cover = self.state().drop_cover;
        let mut fields: Map<String, Value> = body
            .get("fields")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        if let Some(Value::Array(list)) = fields.get(COVER_FIELD) {
            let mirrored: Vec<Value> = if drop_cover {
                Vec::new()
            } else {
                list.iter()
                    .map(|att| {
                        let url = att.get("url").cloned().unwrap_or(Value::Null);
                        json!({
                            "id": "attNew",
                            "url": url,
                            "thumbnails": { "large": { "url": url } }
                        })
                    })
                    .collect()
            };
            fields.insert(COVER_FIELD.to_string(), Value::Array(mirrored));
        }
        json!({ "id": id, "createdTime": "2026-10-18T00:00:00.000Z", "fields": fields })
    }
}

const UNAUTHENTICATED: &str = "{\"error\":\"AUTHENTICATION_REQUIRED\"}";

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {TEST_TOKEN}");
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, UNAUTHENTICATED).into_response()),
    }
}

async fn list_records(
    State(store): State<FakeStore>,
    Path((_base, table)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(res) = authorized(&headers) {
        return res;
    }
    let offset = query.get("offset").cloned();
    let captured = Captured {
        method: "GET",
        table: table.clone(),
        record_id: None,
        query,
        body: Value::Null,
    };
    if let Err(res) = store.record(captured) {
        return res;
    }

    let state = store.state();
    if table == "Globals" {
        let globals: Vec<_> = state.globals.iter().take(1).collect();
        return Json(json!({ "records": globals })).into_response();
    }
    let index = offset
        .as_deref()
        .and_then(|o| o.strip_prefix("page-"))
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(0);
    let records = state.pages.get(index).cloned().unwrap_or_default();
    let mut body = json!({ "records": records });
    if index + 1 < state.pages.len() {
        body["offset"] = json!(format!("page-{}", index + 1));
    }
    Json(body).into_response()
}

async fn create_record(
    State(store): State<FakeStore>,
    Path((_base, table)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(res) = authorized(&headers) {
        return res;
    }
    let captured = Captured {
        method: "POST",
        table,
        record_id: None,
        query: HashMap::new(),
        body: body.clone(),
    };
    if let Err(res) = store.record(captured) {
        return res;
    }
    Json(store.echo("recCreated", &body)).into_response()
}

async fn update_record(
    State(store): State<FakeStore>,
    Path((_base, table, id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(res) = authorized(&headers) {
        return res;
    }
    let captured = Captured {
        method: "PATCH",
        table,
        record_id: Some(id.clone()),
        query: HashMap::new(),
        body: body.clone(),
    };
    if let Err(res) = store.record(captured) {
        return res;
    }
    Json(store.echo(&id, &body)).into_response()
}

async fn delete_record(
    State(store): State<FakeStore>,
    Path((_base, table, id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(res) = authorized(&headers) {
        return res;
    }
    let captured = Captured {
        method: "DELETE",
        table,
        record_id: Some(id.clone()),
        query: HashMap::new(),
        body: Value::Null,
    };
    if let Err(res) = store.record(captured) {
        return res;
    }
    Json(json!({ "id": id, "deleted": true })).into_response()
}
