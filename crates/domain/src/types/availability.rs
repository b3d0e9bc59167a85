//! Availability projection types
//!
//! `SpaceAvailabilityView` is a derived, non-persisted projection: for one
//! `(space, date)` pair it maps every canonical slot hour to its offered
//! state. It is always recomputed from its inputs, never cached directly.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::scheduling::{Slot, SlotDisplay};

/// Offered state of one slot for a space and date.
///
/// Precedence when a slot qualifies for more than one state is
/// `Booked > Blocked > Open`: unblocking never frees a slot that a confirmed
/// event already consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Open,
    Blocked,
    Booked,
}

/// An approved event's hour range for a space and date, supplied by the
/// events subsystem as resolver input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedEvent {
    pub id: String,
    pub title: Option<String>,
    /// First hour the event occupies.
    pub start_hour: u8,
    /// First hour past the event (exclusive).
    pub end_hour: u8,
}

impl ConfirmedEvent {
    /// Whether the event consumes the slot starting at `hour`.
    pub fn contains(&self, hour: u8) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

/// Derived open/blocked/booked state of every slot for one space and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceAvailabilityView {
    pub space_id: String,
    pub date: NaiveDate,
    statuses: BTreeMap<u8, SlotStatus>,
}

impl SpaceAvailabilityView {
    /// Build a view from per-slot states. Callers are expected to supply one
    /// entry per canonical slot.
    pub fn new(
        space_id: impl Into<String>,
        date: NaiveDate,
        entries: impl IntoIterator<Item = (Slot, SlotStatus)>,
    ) -> Self {
        let statuses = entries.into_iter().map(|(slot, status)| (slot.hour(), status)).collect();
        Self { space_id: space_id.into(), date, statuses }
    }

    /// State of the slot starting at `hour`; `None` when outside the grid.
    pub fn status_of(&self, hour: u8) -> Option<SlotStatus> {
        self.statuses.get(&hour).copied()
    }

    /// Whether the slot starting at `hour` is offered as open.
    pub fn is_open(&self, hour: u8) -> bool {
        self.status_of(hour) == Some(SlotStatus::Open)
    }

    /// Iterate `(hour, status)` in ascending hour order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, SlotStatus)> + '_ {
        self.statuses.iter().map(|(hour, status)| (*hour, *status))
    }

    /// Hours currently offered as open, ascending.
    pub fn open_hours(&self) -> Vec<u8> {
        self.iter()
            .filter(|(_, status)| *status == SlotStatus::Open)
            .map(|(hour, _)| hour)
            .collect()
    }
}

/// The contiguous span a slot selection resolves to.
///
/// `start_hour` is the earliest selected slot, `end_hour` is one hour past
/// the latest. The span is derived from the extremes even when the selection
/// has gaps, so it can exceed the selected-slot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_hour: u8,
    /// One hour past the last selected slot (exclusive).
    pub end_hour: u8,
}

impl TimeRange {
    /// Length of the span in hours.
    pub fn span_hours(&self) -> u8 {
        self.end_hour.saturating_sub(self.start_hour)
    }

    /// 12-hour display form of the start.
    pub fn start_display(&self) -> SlotDisplay {
        SlotDisplay::from_hour24(self.start_hour)
    }

    /// 12-hour display form of the (exclusive) end.
    pub fn end_display(&self) -> SlotDisplay {
        SlotDisplay::from_hour24(self.end_hour % 24)
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start_hour, self.end_hour)
    }
}
