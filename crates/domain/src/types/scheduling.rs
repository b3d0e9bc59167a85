//! Slot-grid and blocked-slot types
//!
//! A `Slot` is one bookable hour of the daily grid. A `BlockedSlot` marks a
//! slot unavailable, either on one specific date or weekly. The weekday of a
//! dated block is always derived from the date; it is never an independently
//! settable field, so stored weekday and calendar date cannot drift apart.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    FIRST_SLOT_HOUR, LAST_SLOT_HOUR, WEEKDAY_NAMES, WEEKDAY_SHORT_NAMES,
};
use crate::errors::{PalcoError, Result};

/// Day-of-week index for a calendar date, 0..6 with 0 = Sunday.
///
/// Computed from the civil date alone, never from a UTC instant, so the
/// result cannot shift by one day near midnight in non-UTC zones.
pub fn weekday_index_of(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// One bookable hour-of-day unit within the daily grid.
///
/// The wrapped value is the 24-hour start of the interval and is always in
/// `FIRST_SLOT_HOUR..=LAST_SLOT_HOUR`. Slots are stateless value objects,
/// recreated by the grid generator and never persisted individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Slot(u8);

impl Slot {
    /// Create a slot for the given 24-hour start.
    ///
    /// # Errors
    /// Returns `PalcoError::Validation` when the hour is outside the grid.
    pub fn new(hour: u8) -> Result<Self> {
        if (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&hour) {
            Ok(Self(hour))
        } else {
            Err(PalcoError::Validation(format!(
                "hour {hour} is outside the bookable grid ({FIRST_SLOT_HOUR}..={LAST_SLOT_HOUR})"
            )))
        }
    }

    /// The 24-hour start of this slot.
    pub fn hour(self) -> u8 {
        self.0
    }

    /// 12-hour display form of this slot's start.
    pub fn display(self) -> SlotDisplay {
        SlotDisplay::from_hour24(self.0)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl TryFrom<u8> for Slot {
    type Error = PalcoError;

    fn try_from(hour: u8) -> Result<Self> {
        Self::new(hour)
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> Self {
        slot.0
    }
}

/// AM/PM half of the day for 12-hour display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Meridiem {
    Am,
    Pm,
}

impl std::fmt::Display for Meridiem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Am => write!(f, "AM"),
            Self::Pm => write!(f, "PM"),
        }
    }
}

/// 12-hour rendering of an hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDisplay {
    pub hour12: u8,
    pub meridiem: Meridiem,
}

impl SlotDisplay {
    /// Convert any 24-hour value (0..=23) to its 12-hour display form.
    ///
    /// Hours 0 and 12 are the edge cases and map to 12 AM and 12 PM.
    pub fn from_hour24(hour: u8) -> Self {
        let meridiem = if hour < 12 { Meridiem::Am } else { Meridiem::Pm };
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };
        Self { hour12, meridiem }
    }
}

impl std::fmt::Display for SlotDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.hour12, self.meridiem)
    }
}

/// A day-of-week index paired with a concrete calendar date.
///
/// Only valid within the week window it was generated in; regenerated
/// whenever the anchor date changes. No identity beyond `index` + `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDay {
    /// 0..6 with 0 = Sunday.
    pub index: u8,
    pub name: String,
    pub short_name: String,
    pub date: NaiveDate,
}

impl WeekDay {
    /// Build the `WeekDay` for a concrete calendar date.
    pub fn for_date(date: NaiveDate) -> Self {
        let index = weekday_index_of(date);
        Self {
            index,
            name: WEEKDAY_NAMES[index as usize].to_string(),
            short_name: WEEKDAY_SHORT_NAMES[index as usize].to_string(),
            date,
        }
    }
}

/// When a blocked slot applies: one specific date, or every week on a
/// weekday.
///
/// The closed enum makes the "both date and recurring" state
/// unrepresentable; loose wire records are validated into it at the
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockSchedule {
    /// Blocked for one specific calendar date.
    OnDate { date: NaiveDate },
    /// Blocked every week on the given weekday (0..6, 0 = Sunday).
    Weekly { weekday: u8 },
}

impl BlockSchedule {
    /// The weekday this schedule falls on. For dated blocks this is a
    /// computed property of the date.
    pub fn weekday(&self) -> u8 {
        match self {
            Self::OnDate { date } => weekday_index_of(*date),
            Self::Weekly { weekday } => *weekday,
        }
    }

    /// The concrete date, when this is a one-time block.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::OnDate { date } => Some(*date),
            Self::Weekly { .. } => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, Self::Weekly { .. })
    }

    /// Whether this schedule blocks the given calendar date.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self {
            Self::OnDate { date: blocked } => *blocked == date,
            Self::Weekly { weekday } => *weekday == weekday_index_of(date),
        }
    }
}

/// Which replica of the blocked-slot set a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotOrigin {
    Server,
    Cache,
}

/// Composite identity of a blocked slot, used for deduplication and lookup.
///
/// Uniqueness is per `(date, hour)` for dated blocks and per
/// `(weekday, hour)` for recurring ones, never by record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKey {
    Dated { date: NaiveDate, hour: u8 },
    Weekly { weekday: u8, hour: u8 },
}

/// A record marking one slot of a cultural space unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedSlot {
    pub id: String,
    pub space_id: String,
    pub hour: Slot,
    pub schedule: BlockSchedule,
    pub origin: SlotOrigin,
}

impl BlockedSlot {
    /// Weekday index this block falls on, derived from the schedule.
    pub fn weekday(&self) -> u8 {
        self.schedule.weekday()
    }

    /// Long weekday label for this block.
    pub fn day_name(&self) -> &'static str {
        WEEKDAY_NAMES[self.weekday() as usize]
    }

    /// The concrete date, when this is a one-time block.
    pub fn date(&self) -> Option<NaiveDate> {
        self.schedule.date()
    }

    pub fn is_recurring(&self) -> bool {
        self.schedule.is_recurring()
    }

    /// Composite dedup key; see [`BlockKey`].
    pub fn key(&self) -> BlockKey {
        match self.schedule {
            BlockSchedule::OnDate { date } => BlockKey::Dated { date, hour: self.hour.hour() },
            BlockSchedule::Weekly { weekday } => {
                BlockKey::Weekly { weekday, hour: self.hour.hour() }
            }
        }
    }

    /// Whether this block makes its hour unavailable on the given date.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.schedule.applies_on(date)
    }
}

/// Caller-facing shape of a block creation, mirroring the wire contract.
///
/// The loose `{day, hour, is_recurring, date?}` combination is validated
/// into a [`BlockSchedule`] before any I/O happens; an invalid one-of
/// combination never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRequest {
    /// Weekday index 0..6 (0 = Sunday). For dated requests this is only a
    /// cache of the derivation from `date` and is recomputed on validation.
    pub day: u8,
    pub hour: u8,
    pub is_recurring: bool,
    pub date: Option<NaiveDate>,
}

impl BlockRequest {
    /// Request a weekly recurring block.
    pub fn recurring(day: u8, hour: u8) -> Self {
        Self { day, hour, is_recurring: true, date: None }
    }

    /// Request a block for one specific date.
    pub fn on_date(date: NaiveDate, hour: u8) -> Self {
        Self { day: weekday_index_of(date), hour, is_recurring: false, date: Some(date) }
    }

    /// Validate the request into the strict slot + schedule pair.
    ///
    /// # Errors
    /// Returns `PalcoError::Validation` when the request claims both a date
    /// and recurrence, neither, an out-of-range weekday, or an hour outside
    /// the grid.
    pub fn validate(&self) -> Result<(Slot, BlockSchedule)> {
        let slot = Slot::new(self.hour)?;

        let schedule = match (self.is_recurring, self.date) {
            (true, Some(_)) => {
                return Err(PalcoError::Validation(
                    "a blocked slot cannot be both recurring and date-specific".into(),
                ));
            }
            (true, None) => {
                if self.day > 6 {
                    return Err(PalcoError::Validation(format!(
                        "weekday index {} is outside 0..=6",
                        self.day
                    )));
                }
                BlockSchedule::Weekly { weekday: self.day }
            }
            (false, Some(date)) => BlockSchedule::OnDate { date },
            (false, None) => {
                return Err(PalcoError::Validation(
                    "a one-time blocked slot requires a date".into(),
                ));
            }
        };

        Ok((slot, schedule))
    }

    /// Long weekday label for the wire payload.
    pub fn day_name(&self) -> &'static str {
        let index = match self.date {
            Some(date) => weekday_index_of(date),
            None => self.day.min(6),
        };
        WEEKDAY_NAMES[index as usize]
    }
}

/// The local cache value for one space: the full blocked-slot list plus the
/// moment the owning `load` began.
///
/// `written_at` implements last-successful-load-wins: the cache adapter
/// discards writes stamped older than the entry it already holds, so a slow
/// load that resolves late cannot clobber fresher data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedBlockedSlots {
    pub written_at: DateTime<Utc>,
    pub slots: Vec<BlockedSlot>,
}

/// Reference to a blocked slot by its weekly coordinates, used when the
/// caller only knows `(hour, day)` and any held record id may be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRef {
    pub hour: u8,
    /// Weekday index 0..6 (0 = Sunday).
    pub day: u8,
}

impl SlotRef {
    pub fn new(hour: u8, day: u8) -> Self {
        Self { hour, day }
    }

    /// Whether a blocked slot occupies these coordinates.
    pub fn matches(&self, slot: &BlockedSlot) -> bool {
        slot.hour.hour() == self.hour && slot.weekday() == self.day
    }
}

impl std::fmt::Display for SlotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:02}:00", WEEKDAY_SHORT_NAMES[(self.day.min(6)) as usize], self.hour)
    }
}

/// Progress of a two-step block relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocationPhase {
    /// Intent recorded; the old block has not been deleted yet.
    Pending,
    /// Old block deleted (or already absent); the new block is not created
    /// yet.
    Cleared,
}

/// Persisted intent of an in-progress relocation, so an interrupted swap can
/// be resumed deterministically instead of silently leaving neither (or
/// both) hour blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRelocation {
    pub space_id: String,
    pub from: SlotRef,
    pub to: SlotRef,
    pub phase: RelocationPhase,
}
