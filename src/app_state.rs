//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::SiteService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Site service for page views and admin operations.
    pub site_service: Arc<SiteService>,
}
