//! Slot selection session
//!
//! The transient, in-memory state of a user composing a multi-slot booking
//! request. The session never blocks slots itself: a pending request must
//! not reserve a slot another artist could also request, so blocking only
//! happens when a manager approves the resulting request.

use std::collections::BTreeSet;

use palco_domain::{PalcoError, Result, Slot, SpaceAvailabilityView, TimeRange};
use tracing::debug;

/// Lifecycle of a selection session. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Selecting,
    Submitted,
}

/// Result of a toggle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The slot's availability state is not open; the selection is
    /// unchanged.
    Unavailable,
    /// The session has already been submitted.
    Closed,
}

/// In-memory selection of slots within one booking flow.
///
/// The reported time range is derived from the extremes of the selection
/// (`start = min`, `end = max + 1`) while the duration is the selected-slot
/// count. With a gapped selection the two diverge; whether gaps should be
/// rejected outright or silently closed into the span is an open product
/// question, so the behavior of the legacy flow is kept as observed.
#[derive(Debug, Default)]
pub struct SlotSelectionSession {
    selected: BTreeSet<u8>,
    submitted: bool,
}

impl SlotSelectionSession {
    /// Open a fresh, empty session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.submitted {
            SessionState::Submitted
        } else if self.selected.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Selecting
        }
    }

    /// Whether the current selection can be submitted.
    pub fn is_valid(&self) -> bool {
        !self.submitted && !self.selected.is_empty()
    }

    /// Select or deselect one slot.
    ///
    /// The slot must be offered as open in the given availability view;
    /// anything else leaves the selection unchanged and reports
    /// [`ToggleOutcome::Unavailable`].
    pub fn toggle(&mut self, slot: Slot, view: &SpaceAvailabilityView) -> ToggleOutcome {
        if self.submitted {
            return ToggleOutcome::Closed;
        }

        let hour = slot.hour();
        if !view.is_open(hour) {
            debug!(hour, space_id = %view.space_id, "rejected toggle of non-open slot");
            return ToggleOutcome::Unavailable;
        }

        if self.selected.remove(&hour) {
            ToggleOutcome::Removed
        } else {
            self.selected.insert(hour);
            ToggleOutcome::Added
        }
    }

    /// The selected slots in ascending hour order.
    pub fn selected_slots(&self) -> Vec<Slot> {
        self.selected.iter().filter_map(|hour| Slot::new(*hour).ok()).collect()
    }

    /// Number of selected slots. Can be less than the span length when the
    /// selection has gaps.
    pub fn duration_hours(&self) -> usize {
        self.selected.len()
    }

    /// The span defined by the selection's extremes, or `None` while empty.
    pub fn time_range(&self) -> Option<TimeRange> {
        let start_hour = *self.selected.first()?;
        let end_hour = *self.selected.last()? + 1;
        Some(TimeRange { start_hour, end_hour })
    }

    /// Close the session and hand its time range to the request-submission
    /// flow.
    ///
    /// # Errors
    /// Returns `PalcoError::Validation` when nothing is selected or the
    /// session was already submitted.
    pub fn submit(&mut self) -> Result<TimeRange> {
        if self.submitted {
            return Err(PalcoError::Validation("selection already submitted".into()));
        }
        let range = self
            .time_range()
            .ok_or_else(|| PalcoError::Validation("no slots selected".into()))?;

        self.submitted = true;
        debug!(range = %range, hours = self.selected.len(), "slot selection submitted");
        Ok(range)
    }

    /// Drop the current selection. A submitted session stays terminal.
    pub fn clear(&mut self) {
        if !self.submitted {
            self.selected.clear();
        }
    }
}
