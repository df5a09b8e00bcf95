//! Datastore boundary: wire types, field mapping, and the REST client.
//!
//! The hosted tabular datastore is the system of record. Nothing in this
//! crate keeps event data between requests.

pub mod cache;
pub mod client;
pub mod fields;
pub mod record;

pub use cache::CacheWindow;
pub use client::StoreClient;
