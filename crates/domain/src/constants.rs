//! Domain constants
//!
//! Centralized location for the scheduling grid bounds and calendar label
//! tables shared by every layer.

/// First bookable start hour of the daily grid (6 AM).
pub const FIRST_SLOT_HOUR: u8 = 6;

/// Last bookable start hour of the daily grid (10 PM).
pub const LAST_SLOT_HOUR: u8 = 22;

/// Number of slots in the canonical daily grid.
pub const SLOTS_PER_DAY: usize = (LAST_SLOT_HOUR - FIRST_SLOT_HOUR + 1) as usize;

/// Weekday names indexed 0..6 with Sunday first.
pub const WEEKDAY_NAMES: [&str; 7] =
    ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

/// Abbreviated weekday labels indexed 0..6 with Sunday first.
pub const WEEKDAY_SHORT_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
