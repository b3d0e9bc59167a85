//! Domain types and models
//!
//! Value objects for the scheduling grid plus the blocked-slot records
//! reconciled between the Remote Schedule Store and the local cache.

pub mod availability;
pub mod scheduling;

// Re-export the scheduling vocabulary for convenience
pub use availability::{ConfirmedEvent, SlotStatus, SpaceAvailabilityView, TimeRange};
pub use scheduling::{
    weekday_index_of, BlockKey, BlockRequest, BlockSchedule, BlockedSlot, CachedBlockedSlots,
    Meridiem, PendingRelocation, RelocationPhase, Slot, SlotDisplay, SlotOrigin, SlotRef, WeekDay,
};
