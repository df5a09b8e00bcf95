//! # nomadisch-site
//!
//! Backend for the Nomadisch Labs events site: public page data and a
//! password-gated admin API over a hosted tabular datastore.
//!
//! The datastore is the system of record. This crate normalizes its
//! loosely-typed records into [`domain::Event`] values, checks cover
//! image URLs before writing them, confirms the datastore actually
//! attached the image afterwards, and resolves which ticket link each
//! page should show.
//!
//! ## Architecture
//!
//! ```text
//! Clients (public pages, admin panel)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── SiteService + AdminGuard (service/)
//!     │
//!     ├── Normalizer, Ordering, Ticket resolver (domain/)
//!     │
//!     ├── StoreClient (store/) ──── datastore REST API
//!     └── Image check, Uploader (media/) ──── remote image hosts
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod media;
pub mod service;
pub mod store;

#[cfg(test)]
mod test_support;
