//! Canonical daily slot grid
//!
//! Every space offers the same hourly grid; availability is a per-date
//! projection over it, never a different set of slots.

use palco_domain::constants::{
    FIRST_SLOT_HOUR, LAST_SLOT_HOUR, SLOTS_PER_DAY, WEEKDAY_NAMES, WEEKDAY_SHORT_NAMES,
};
use palco_domain::{Slot, SlotDisplay};

/// The ordered daily grid: one slot per bookable start hour.
///
/// Always returns exactly [`SLOTS_PER_DAY`] slots with strictly increasing
/// hours. Pure and infallible.
pub fn daily_slots() -> Vec<Slot> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).filter_map(|hour| Slot::new(hour).ok()).collect()
}

/// 12-hour display form for any 24-hour value.
///
/// Total over 0..=23; hours 0 and 12 map to 12 AM / 12 PM.
pub fn display_form(hour: u8) -> SlotDisplay {
    SlotDisplay::from_hour24(hour)
}

/// Canonical long weekday labels, Sunday-first.
pub fn weekday_labels() -> [&'static str; 7] {
    WEEKDAY_NAMES
}

/// Canonical abbreviated weekday labels, Sunday-first.
pub fn weekday_short_labels() -> [&'static str; 7] {
    WEEKDAY_SHORT_NAMES
}
