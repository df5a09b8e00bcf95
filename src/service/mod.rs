//! Service layer: read views, admin orchestration, and the admin gate.

pub mod admin_guard;
pub mod site_service;
pub mod views;

pub use admin_guard::AdminGuard;
pub use site_service::SiteService;
