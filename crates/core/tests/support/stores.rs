//! Mock port implementations for testing
//!
//! Provides in-memory mocks for the scheduling ports, enabling
//! deterministic service tests without network or database dependencies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use palco_core::{BlockedSlotCache, RemoteScheduleStore};
use palco_domain::{
    BlockRequest, BlockedSlot, CachedBlockedSlots, PalcoError, PendingRelocation,
    Result as DomainResult, SlotOrigin,
};

#[derive(Default)]
struct RemoteState {
    slots: Vec<BlockedSlot>,
    fail_reads: bool,
    fail_writes: bool,
    fetch_calls: usize,
    create_calls: usize,
    deleted: Vec<String>,
    next_id: usize,
}

/// In-memory mock for `RemoteScheduleStore`.
///
/// Serves a seeded slot set, records calls, and can simulate outages and
/// slow responses.
#[derive(Default)]
pub struct MockRemoteScheduleStore {
    state: Mutex<RemoteState>,
    fetch_delay_ms: AtomicU64,
}

impl MockRemoteScheduleStore {
    pub fn new(slots: Vec<BlockedSlot>) -> Self {
        Self {
            state: Mutex::new(RemoteState { slots, ..RemoteState::default() }),
            fetch_delay_ms: AtomicU64::new(0),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().expect("remote state").fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().expect("remote state").fail_writes = fail;
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        self.fetch_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.state.lock().expect("remote state").fetch_calls
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().expect("remote state").create_calls
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.state.lock().expect("remote state").deleted.clone()
    }

    pub fn slots(&self) -> Vec<BlockedSlot> {
        self.state.lock().expect("remote state").slots.clone()
    }
}

#[async_trait]
impl RemoteScheduleStore for MockRemoteScheduleStore {
    async fn fetch_blocked_slots(
        &self,
        space_id: &str,
        date: Option<NaiveDate>,
    ) -> DomainResult<Vec<BlockedSlot>> {
        let delay = self.fetch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let mut state = self.state.lock().expect("remote state");
        state.fetch_calls += 1;
        if state.fail_reads {
            return Err(PalcoError::Network("simulated outage".into()));
        }

        let mut slots: Vec<BlockedSlot> =
            state.slots.iter().filter(|slot| slot.space_id == space_id).cloned().collect();
        if let Some(date) = date {
            slots.retain(|slot| slot.applies_on(date));
        }
        Ok(slots)
    }

    async fn create_blocked_slot(
        &self,
        space_id: &str,
        request: &BlockRequest,
    ) -> DomainResult<BlockedSlot> {
        let mut state = self.state.lock().expect("remote state");
        state.create_calls += 1;
        if state.fail_writes {
            return Err(PalcoError::Network("simulated outage".into()));
        }

        let (slot, schedule) = request.validate()?;
        state.next_id += 1;
        let created = BlockedSlot {
            id: format!("remote-{}", state.next_id),
            space_id: space_id.to_string(),
            hour: slot,
            schedule,
            origin: SlotOrigin::Server,
        };
        state.slots.push(created.clone());
        Ok(created)
    }

    async fn delete_blocked_slot(&self, blocked_slot_id: &str) -> DomainResult<()> {
        let mut state = self.state.lock().expect("remote state");
        state.deleted.push(blocked_slot_id.to_string());

        let before = state.slots.len();
        state.slots.retain(|slot| slot.id != blocked_slot_id);
        if state.slots.len() == before {
            Err(PalcoError::NotFound(format!("blocked slot {blocked_slot_id}")))
        } else {
            Ok(())
        }
    }
}

/// In-memory mock for `BlockedSlotCache` with the same last-write-wins
/// semantics as the persistent adapter.
#[derive(Default)]
pub struct MockBlockedSlotCache {
    entries: Mutex<HashMap<String, CachedBlockedSlots>>,
    relocations: Mutex<HashMap<String, PendingRelocation>>,
    fail_reads: AtomicBool,
}

impl MockBlockedSlotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, space_id: &str, entry: CachedBlockedSlots) {
        self.entries.lock().expect("cache entries").insert(space_id.to_string(), entry);
    }

    pub fn seed_relocation(&self, intent: PendingRelocation) {
        self.relocations
            .lock()
            .expect("cache relocations")
            .insert(intent.space_id.clone(), intent);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn entry(&self, space_id: &str) -> Option<CachedBlockedSlots> {
        self.entries.lock().expect("cache entries").get(space_id).cloned()
    }

    pub fn relocation(&self, space_id: &str) -> Option<PendingRelocation> {
        self.relocations.lock().expect("cache relocations").get(space_id).cloned()
    }
}

#[async_trait]
impl BlockedSlotCache for MockBlockedSlotCache {
    async fn read(&self, space_id: &str) -> DomainResult<Option<CachedBlockedSlots>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PalcoError::Cache("simulated cache failure".into()));
        }
        Ok(self.entries.lock().expect("cache entries").get(space_id).cloned())
    }

    async fn write(&self, space_id: &str, entry: &CachedBlockedSlots) -> DomainResult<bool> {
        let mut entries = self.entries.lock().expect("cache entries");
        if let Some(existing) = entries.get(space_id) {
            if existing.written_at > entry.written_at {
                return Ok(false);
            }
        }
        entries.insert(space_id.to_string(), entry.clone());
        Ok(true)
    }

    async fn pending_relocation(
        &self,
        space_id: &str,
    ) -> DomainResult<Option<PendingRelocation>> {
        Ok(self.relocations.lock().expect("cache relocations").get(space_id).cloned())
    }

    async fn save_pending_relocation(&self, intent: &PendingRelocation) -> DomainResult<()> {
        self.relocations
            .lock()
            .expect("cache relocations")
            .insert(intent.space_id.clone(), intent.clone());
        Ok(())
    }

    async fn clear_pending_relocation(&self, space_id: &str) -> DomainResult<()> {
        self.relocations.lock().expect("cache relocations").remove(space_id);
        Ok(())
    }
}
