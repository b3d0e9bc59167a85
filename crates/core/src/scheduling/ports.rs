//! Port interfaces for blocked-slot scheduling
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::NaiveDate;
use palco_domain::{BlockRequest, BlockedSlot, CachedBlockedSlots, PendingRelocation, Result};

/// Trait for the Remote Schedule Store: the HTTP-backed source of truth for
/// blocked slots.
#[async_trait]
pub trait RemoteScheduleStore: Send + Sync {
    /// Fetch blocked slots for a space, optionally scoped to one date.
    async fn fetch_blocked_slots(
        &self,
        space_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<BlockedSlot>>;

    /// Create a blocked slot and return the stored record.
    async fn create_blocked_slot(
        &self,
        space_id: &str,
        request: &BlockRequest,
    ) -> Result<BlockedSlot>;

    /// Delete a blocked slot by record id. A missing record surfaces as
    /// `PalcoError::NotFound`; callers decide whether that is an error.
    async fn delete_blocked_slot(&self, blocked_slot_id: &str) -> Result<()>;
}

/// Trait for the persistent local replica of the blocked-slot set, keyed by
/// space id.
#[async_trait]
pub trait BlockedSlotCache: Send + Sync {
    /// Read the cached entry for a space, if any.
    async fn read(&self, space_id: &str) -> Result<Option<CachedBlockedSlots>>;

    /// Replace the cached entry for a space.
    ///
    /// Writes are last-write-wins on `written_at`: an entry stamped older
    /// than the stored one is discarded. Returns whether the write was
    /// applied.
    async fn write(&self, space_id: &str, entry: &CachedBlockedSlots) -> Result<bool>;

    /// The persisted relocation intent for a space, if one is in progress.
    async fn pending_relocation(&self, space_id: &str) -> Result<Option<PendingRelocation>>;

    /// Persist (or update the phase of) a relocation intent.
    async fn save_pending_relocation(&self, intent: &PendingRelocation) -> Result<()>;

    /// Remove the relocation intent for a space.
    async fn clear_pending_relocation(&self, space_id: &str) -> Result<()>;
}
