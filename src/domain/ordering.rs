//! Display ordering for event lists.

use serde::Serialize;
use utoipa::ToSchema;

use super::event::{Event, EventStatus};

const fn bucket(status: EventStatus) -> u8 {
    match status {
        EventStatus::Upcoming => 0,
        EventStatus::Past => 1,
        EventStatus::Cancelled => 2,
    }
}

/// Upcoming first (soonest first), then past, then cancelled (both most
/// recent first).
pub fn sort_for_display(events: &mut [Event]) {
    events.sort_by(|a, b| {
        bucket(a.status)
            .cmp(&bucket(b.status))
            .then_with(|| match a.status {
                EventStatus::Upcoming if b.status == EventStatus::Upcoming => {
                    a.date_start.cmp(&b.date_start)
                }
                _ => b.date_start.cmp(&a.date_start),
            })
    });
}

/// Most recent start first.
pub fn sort_newest_first(events: &mut [Event]) {
    events.sort_by(|a, b| b.date_start.cmp(&a.date_start));
}

/// Events split by status, each list in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct GroupedEvents {
    /// Upcoming, soonest first.
    pub upcoming: Vec<Event>,
    /// Past, most recent first.
    pub past: Vec<Event>,
    /// Cancelled, most recent first.
    pub cancelled: Vec<Event>,
}

impl GroupedEvents {
    /// Groups and orders a flat list.
    #[must_use]
    pub fn from_events(mut events: Vec<Event>) -> Self {
        sort_for_display(&mut events);
        let mut grouped = Self::default();
        for event in events {
            match event.status {
                EventStatus::Upcoming => grouped.upcoming.push(event),
                EventStatus::Past => grouped.past.push(event),
                EventStatus::Cancelled => grouped.cancelled.push(event),
            }
        }
        grouped
    }

    /// Total number of events across groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.upcoming.len() + self.past.len() + self.cancelled.len()
    }

    /// Whether every group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
