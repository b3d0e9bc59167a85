//! Availability resolution
//!
//! Merges blocked slots and confirmed-event ranges into the grid offered to
//! an end user. Deterministic given its inputs, which is what keeps it
//! independently testable from the blocked-slot store.

use chrono::NaiveDate;
use palco_domain::{BlockedSlot, ConfirmedEvent, SlotStatus, SpaceAvailabilityView};

use crate::time_grid::daily_slots;

/// Compute the offered state of every canonical slot for one space and date.
///
/// Precedence per slot is `Booked > Blocked > Open`: a manager cannot free a
/// slot that a confirmed event actually consumes by merely unblocking it.
/// Blocked slots match either on the exact date or, for weekly blocks, on
/// the date's weekday.
pub fn resolve(
    space_id: &str,
    date: NaiveDate,
    blocked_slots: &[BlockedSlot],
    confirmed_events: &[ConfirmedEvent],
) -> SpaceAvailabilityView {
    let entries = daily_slots().into_iter().map(|slot| {
        let hour = slot.hour();

        let status = if confirmed_events.iter().any(|event| event.contains(hour)) {
            SlotStatus::Booked
        } else if blocked_slots
            .iter()
            .any(|blocked| blocked.hour.hour() == hour && blocked.applies_on(date))
        {
            SlotStatus::Blocked
        } else {
            SlotStatus::Open
        };

        (slot, status)
    });

    SpaceAvailabilityView::new(space_id, date, entries)
}

#[cfg(test)]
mod tests {
    use palco_domain::{BlockSchedule, Slot, SlotOrigin};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn blocked(id: &str, hour: u8, schedule: BlockSchedule) -> BlockedSlot {
        BlockedSlot {
            id: id.into(),
            space_id: "space-1".into(),
            hour: Slot::new(hour).expect("valid hour"),
            schedule,
            origin: SlotOrigin::Server,
        }
    }

    fn event(start_hour: u8, end_hour: u8) -> ConfirmedEvent {
        ConfirmedEvent { id: "ev-1".into(), title: None, start_hour, end_hour }
    }

    #[test]
    fn empty_inputs_leave_the_whole_grid_open() {
        let view = resolve("space-1", date(2025, 4, 29), &[], &[]);
        assert_eq!(view.open_hours().len(), 17);
    }

    #[test]
    fn booked_wins_over_blocked() {
        let d = date(2025, 4, 29);
        let blocks = [blocked("b-1", 18, BlockSchedule::OnDate { date: d })];
        let events = [event(18, 19)];

        let view = resolve("space-1", d, &blocks, &events);

        assert_eq!(view.status_of(18), Some(SlotStatus::Booked));
    }

    #[test]
    fn recurring_block_applies_on_matching_weekdays_only() {
        // Weekly block on Tuesday 14:00.
        let blocks = [blocked("b-1", 14, BlockSchedule::Weekly { weekday: 2 })];

        // Two Tuesdays three weeks apart, and the Wednesday in between.
        let first_tuesday = date(2025, 4, 8);
        let later_tuesday = date(2025, 4, 29);
        let wednesday = date(2025, 4, 9);

        for tuesday in [first_tuesday, later_tuesday] {
            let view = resolve("space-1", tuesday, &blocks, &[]);
            assert_eq!(view.status_of(14), Some(SlotStatus::Blocked), "tuesday {tuesday}");
        }

        let view = resolve("space-1", wednesday, &blocks, &[]);
        assert_eq!(view.status_of(14), Some(SlotStatus::Open));
    }

    #[test]
    fn dated_block_carries_its_own_weekday() {
        // 2025-04-29 is a Tuesday; the record's weekday is derived from the
        // date, so resolver and store can never disagree about it.
        let d = date(2025, 4, 29);
        let block = blocked("b-1", 10, BlockSchedule::OnDate { date: d });
        assert_eq!(block.weekday(), crate::week::weekday_index_of(d));

        let view = resolve("space-1", d, &[block.clone()], &[]);
        assert_eq!(view.status_of(10), Some(SlotStatus::Blocked));

        // Same weekday one week later: a dated block does not recur.
        let next_week = date(2025, 5, 6);
        let view = resolve("space-1", next_week, &[block], &[]);
        assert_eq!(view.status_of(10), Some(SlotStatus::Open));
    }

    #[test]
    fn events_book_every_hour_in_their_range() {
        let d = date(2025, 4, 29);
        let view = resolve("space-1", d, &[], &[event(19, 22)]);

        assert_eq!(view.status_of(18), Some(SlotStatus::Open));
        assert_eq!(view.status_of(19), Some(SlotStatus::Booked));
        assert_eq!(view.status_of(21), Some(SlotStatus::Booked));
        assert_eq!(view.status_of(22), Some(SlotStatus::Open));
    }
}
