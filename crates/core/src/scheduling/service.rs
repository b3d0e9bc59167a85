//! Blocked slot store - core business logic
//!
//! Owns create/read/delete of blocked slots across the two replicas: the
//! Remote Schedule Store is authoritative, the local cache is the fallback
//! for reads when the network is down. The cache is only ever overwritten by
//! a successful `load`, never by writes, so a failed remote block can never
//! appear blocked locally.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use palco_domain::{
    BlockKey, BlockRequest, BlockSchedule, BlockedSlot, CachedBlockedSlots, PalcoError,
    PendingRelocation, RelocationPhase, Result, SlotOrigin, SlotRef,
};
use tracing::{debug, info, warn};

use super::ops::{OperationKind, OperationTracker};
use super::ports::{BlockedSlotCache, RemoteScheduleStore};

/// Blocked slot store service.
pub struct BlockedSlotStore {
    remote: Arc<dyn RemoteScheduleStore>,
    cache: Arc<dyn BlockedSlotCache>,
    ops: OperationTracker,
}

impl BlockedSlotStore {
    /// Create a new store over the two injected replicas.
    pub fn new(remote: Arc<dyn RemoteScheduleStore>, cache: Arc<dyn BlockedSlotCache>) -> Self {
        Self { remote, cache, ops: OperationTracker::new() }
    }

    /// Load the blocked slots of a space, optionally scoped to one date.
    ///
    /// Remote first; a successful result is normalized, deduplicated and
    /// written to the cache as a full replacement for the space (stamped
    /// with the moment the load began, so a slow load cannot clobber a
    /// fresher one). On network failure the cached set is served instead; an
    /// empty or unreadable cache yields an empty list, since "no blocks
    /// known" merely under-blocks.
    pub async fn load(
        &self,
        space_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<BlockedSlot>> {
        let guard = self.ops.begin(space_id, OperationKind::Load);
        let started_at = Utc::now();

        let fetched = tokio::select! {
            () = guard.cancelled() => return Err(superseded("load", space_id)),
            result = self.remote.fetch_blocked_slots(space_id, date) => result,
        };

        match fetched {
            Ok(slots) => {
                let (normalized, removed) = normalize(slots);
                if removed > 0 {
                    debug!(space_id, removed, "deduplicated blocked slots from remote load");
                }
                if guard.is_cancelled() {
                    return Err(superseded("load", space_id));
                }

                let entry =
                    CachedBlockedSlots { written_at: started_at, slots: normalized.clone() };
                match self.cache.write(space_id, &entry).await {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!(space_id, "cache holds a newer entry; load result not persisted");
                    }
                    Err(err) => {
                        warn!(space_id, error = %err, "failed to refresh blocked-slot cache");
                    }
                }
                Ok(normalized)
            }
            Err(err @ PalcoError::Cancelled(_)) => Err(err),
            Err(err) => {
                warn!(space_id, error = %err, "remote load failed; serving cached blocked slots");
                Ok(self.cached_slots(space_id, date).await)
            }
        }
    }

    /// Create a blocked slot.
    ///
    /// The one-of `{date, recurring}` invariant is validated before any
    /// network call. The cache is not written speculatively; it catches up
    /// on the next `load`.
    ///
    /// # Errors
    /// `Validation` for an invalid request, `Network` when the remote call
    /// fails (the slot is then not blocked anywhere).
    pub async fn block(&self, space_id: &str, request: &BlockRequest) -> Result<BlockedSlot> {
        let (slot, schedule) = request.validate()?;
        let guard = self.ops.begin(space_id, OperationKind::Block);

        let created = tokio::select! {
            () = guard.cancelled() => return Err(superseded("block", space_id)),
            result = self.remote.create_blocked_slot(space_id, request) => result?,
        };

        info!(
            space_id,
            hour = slot.hour(),
            recurring = schedule.is_recurring(),
            "blocked slot created"
        );
        Ok(created)
    }

    /// Delete a blocked slot by id.
    ///
    /// Fails fast with a local validation error when no id is supplied,
    /// without touching the network. A remote `NotFound` means the desired
    /// end state already holds and is treated as success.
    pub async fn unblock(&self, blocked_slot_id: Option<&str>) -> Result<()> {
        let id = blocked_slot_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| PalcoError::Validation("no slot selected".into()))?;

        match self.remote.delete_blocked_slot(id).await {
            Ok(()) => {
                info!(blocked_slot_id = id, "blocked slot removed");
                Ok(())
            }
            Err(PalcoError::NotFound(_)) => {
                debug!(blocked_slot_id = id, "blocked slot already absent");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Move a block from one weekly coordinate to another, as happens when
    /// an approved event's time is edited.
    ///
    /// The source slot is looked up by `(hour, day)` against a fresh
    /// unscoped fetch, since a record id held since approval time may be
    /// stale.
    /// The swap is two remote calls, not a transaction; the intent is
    /// persisted and phase-advanced so [`Self::resume_relocation`] can
    /// finish an interrupted swap. A missing source slot is not an error:
    /// the delete step is skipped and the target block is still created.
    pub async fn relocate(
        &self,
        space_id: &str,
        from: SlotRef,
        to: SlotRef,
    ) -> Result<BlockedSlot> {
        let _guard = self.ops.begin(space_id, OperationKind::Relocate);

        let intent = PendingRelocation {
            space_id: space_id.to_string(),
            from,
            to,
            phase: RelocationPhase::Pending,
        };
        if let Err(err) = self.cache.save_pending_relocation(&intent).await {
            warn!(space_id, error = %err, "failed to persist relocation intent");
        }

        self.run_relocation(intent).await
    }

    /// Finish a relocation that was interrupted mid-swap, if one is
    /// recorded for the space. Returns the created block, or `None` when no
    /// intent is pending.
    pub async fn resume_relocation(&self, space_id: &str) -> Result<Option<BlockedSlot>> {
        let Some(intent) = self.cache.pending_relocation(space_id).await? else {
            return Ok(None);
        };

        info!(space_id, phase = ?intent.phase, "resuming interrupted relocation");
        self.run_relocation(intent).await.map(Some)
    }

    /// Repair a per-date index by dropping duplicate hours within each date
    /// bucket. Returns the cleaned structure and how many entries were
    /// removed.
    ///
    /// This is the maintenance counterpart of the dedup `load` performs
    /// automatically: date buckets only ever hold one block per hour, so the
    /// key within a bucket is the hour alone.
    pub fn deduplicate(
        by_date: &BTreeMap<NaiveDate, Vec<BlockedSlot>>,
    ) -> (BTreeMap<NaiveDate, Vec<BlockedSlot>>, usize) {
        let mut removed = 0;
        let mut cleaned = BTreeMap::new();

        for (date, slots) in by_date {
            let mut seen_hours = HashSet::new();
            let mut kept = Vec::with_capacity(slots.len());
            for slot in slots {
                if seen_hours.insert(slot.hour.hour()) {
                    kept.push(slot.clone());
                } else {
                    removed += 1;
                }
            }
            cleaned.insert(*date, kept);
        }

        (cleaned, removed)
    }

    async fn run_relocation(&self, mut intent: PendingRelocation) -> Result<BlockedSlot> {
        let space_id = intent.space_id.clone();
        let mut displaced_schedule = None;

        if intent.phase == RelocationPhase::Pending {
            let existing = self.remote.fetch_blocked_slots(&space_id, None).await?;

            if let Some(current) = existing.iter().find(|slot| intent.from.matches(slot)) {
                displaced_schedule = Some(current.schedule);
                match self.remote.delete_blocked_slot(&current.id).await {
                    Ok(()) => {}
                    Err(PalcoError::NotFound(_)) => {
                        debug!(
                            space_id,
                            blocked_slot_id = %current.id,
                            "slot vanished before delete; proceeding"
                        );
                    }
                    Err(err) => return Err(err),
                }
            } else {
                debug!(space_id, from = %intent.from, "no blocked slot at source; nothing to clear");
            }

            intent.phase = RelocationPhase::Cleared;
            if let Err(err) = self.cache.save_pending_relocation(&intent).await {
                warn!(space_id, error = %err, "failed to advance relocation intent");
            }
        }

        let request = relocation_request(&intent, displaced_schedule);
        let created = self.remote.create_blocked_slot(&space_id, &request).await?;

        if let Err(err) = self.cache.clear_pending_relocation(&space_id).await {
            warn!(space_id, error = %err, "failed to clear completed relocation intent");
        }
        info!(space_id, from = %intent.from, to = %intent.to, "blocked slot relocated");
        Ok(created)
    }

    async fn cached_slots(&self, space_id: &str, date: Option<NaiveDate>) -> Vec<BlockedSlot> {
        let entry = match self.cache.read(space_id).await {
            Ok(entry) => entry,
            Err(err) => {
                warn!(space_id, error = %err, "cache read failed; treating as empty");
                None
            }
        };

        let mut slots = entry.map(|cached| cached.slots).unwrap_or_default();
        for slot in &mut slots {
            slot.origin = SlotOrigin::Cache;
        }
        if let Some(date) = date {
            slots.retain(|slot| slot.applies_on(date));
        }
        slots
    }
}

/// Drop composite-key duplicates and order the set deterministically.
///
/// The weekday of a dated record is a computed property of its date, so the
/// historical "stored day drifted from the date" class of bad data cannot
/// reach this point; normalization is dedup plus ordering.
fn normalize(slots: Vec<BlockedSlot>) -> (Vec<BlockedSlot>, usize) {
    let mut seen: HashSet<BlockKey> = HashSet::new();
    let mut kept = Vec::with_capacity(slots.len());
    let mut removed = 0;

    for slot in slots {
        if seen.insert(slot.key()) {
            kept.push(slot);
        } else {
            removed += 1;
        }
    }

    kept.sort_by_key(|slot| (slot.is_recurring(), slot.date(), slot.weekday(), slot.hour.hour()));
    (kept, removed)
}

/// Shape of the block created at the target coordinates.
///
/// The new block inherits the displaced one's schedule: a dated block moves
/// within its week to the target weekday, a weekly block stays weekly. When
/// the source was absent (or the swap is resumed past the delete step), the
/// weekly coordinates are all that is known, so the target is created as
/// recurring.
fn relocation_request(
    intent: &PendingRelocation,
    displaced: Option<BlockSchedule>,
) -> BlockRequest {
    match displaced {
        Some(BlockSchedule::OnDate { date }) => {
            let delta = i64::from(intent.to.day) - i64::from(intent.from.day);
            let target =
                date.checked_add_signed(chrono::Duration::days(delta)).unwrap_or(date);
            BlockRequest::on_date(target, intent.to.hour)
        }
        Some(BlockSchedule::Weekly { .. }) | None => {
            BlockRequest::recurring(intent.to.day, intent.to.hour)
        }
    }
}

fn superseded(operation: &str, space_id: &str) -> PalcoError {
    PalcoError::Cancelled(format!("{operation} for space {space_id} superseded by a newer call"))
}
