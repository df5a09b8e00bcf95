//! Domain layer: events, site settings, and the pure rules over them.
//!
//! Nothing here performs I/O. Record normalization, display ordering, and
//! ticket link resolution are plain functions over owned values so the
//! store and service layers can share them.

pub mod event;
pub mod normalize;
pub mod ordering;
pub mod settings;
pub mod ticket;
pub mod upsert;

pub use event::{Event, EventId, EventStatus};
pub use settings::GlobalSettings;
