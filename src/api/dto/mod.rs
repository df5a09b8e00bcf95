//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names are camelCase to match the datastore columns the admin
//! panel already knows.

pub mod common_dto;
pub mod event_dto;

pub use common_dto::*;
pub use event_dto::*;
