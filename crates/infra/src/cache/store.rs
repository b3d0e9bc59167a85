//! SQLite-backed implementation of the `BlockedSlotCache` port.
//!
//! One row per space holding the serialized blocked-slot list. Writes are
//! last-write-wins on the stamp taken when the owning load began, enforced
//! in SQL, so a stale load result can never replace a fresher entry. All
//! queries run through the shared `CacheManager` pool on the blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use palco_core::BlockedSlotCache;
use palco_domain::{
    CachedBlockedSlots, PalcoError, PendingRelocation, Result as DomainResult,
};
use rusqlite::{params, OptionalExtension};
use tokio::task;
use tracing::warn;

use super::manager::CacheManager;
use crate::errors::InfraError;

/// SQLite-backed blocked-slot cache.
pub struct SqliteBlockedSlotCache {
    db: Arc<CacheManager>,
}

impl SqliteBlockedSlotCache {
    /// Create a new cache backed by the shared `CacheManager`.
    pub fn new(db: Arc<CacheManager>) -> Self {
        Self { db }
    }
}

const CACHE_SELECT: &str = "SELECT payload FROM blocked_slot_cache WHERE space_id = ?1";

const CACHE_UPSERT: &str = "INSERT INTO blocked_slot_cache (space_id, payload, written_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(space_id) DO UPDATE SET
        payload = excluded.payload,
        written_at = excluded.written_at
    WHERE excluded.written_at >= blocked_slot_cache.written_at";

const RELOCATION_SELECT: &str = "SELECT payload FROM pending_relocations WHERE space_id = ?1";

const RELOCATION_UPSERT: &str = "INSERT OR REPLACE INTO pending_relocations
    (space_id, payload, updated_at)
    VALUES (?1, ?2, CAST(strftime('%s','now') AS INTEGER))";

const RELOCATION_DELETE: &str = "DELETE FROM pending_relocations WHERE space_id = ?1";

#[async_trait]
impl BlockedSlotCache for SqliteBlockedSlotCache {
    async fn read(&self, space_id: &str) -> DomainResult<Option<CachedBlockedSlots>> {
        let db = Arc::clone(&self.db);
        let space_id = space_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Option<CachedBlockedSlots>> {
            let conn = db.get_connection()?;
            let payload: Option<String> = conn
                .query_row(CACHE_SELECT, params![space_id], |row| row.get(0))
                .optional()
                .map_err(map_sql_error)?;

            Ok(payload.and_then(|payload| parse_payload(&space_id, &payload)))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn write(&self, space_id: &str, entry: &CachedBlockedSlots) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let space_id = space_id.to_owned();
        let written_at = entry.written_at.timestamp_millis();
        let payload = serde_json::to_string(entry).map_err(map_json_error)?;

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(CACHE_UPSERT, params![space_id, payload, written_at])
                .map_err(map_sql_error)?;
            Ok(changed == 1)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn pending_relocation(
        &self,
        space_id: &str,
    ) -> DomainResult<Option<PendingRelocation>> {
        let db = Arc::clone(&self.db);
        let space_id = space_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Option<PendingRelocation>> {
            let conn = db.get_connection()?;
            let payload: Option<String> = conn
                .query_row(RELOCATION_SELECT, params![space_id], |row| row.get(0))
                .optional()
                .map_err(map_sql_error)?;

            match payload {
                None => Ok(None),
                Some(payload) => {
                    serde_json::from_str(&payload).map(Some).map_err(map_json_error)
                }
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save_pending_relocation(&self, intent: &PendingRelocation) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let space_id = intent.space_id.clone();
        let payload = serde_json::to_string(intent).map_err(map_json_error)?;

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(RELOCATION_UPSERT, params![space_id, payload]).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn clear_pending_relocation(&self, space_id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let space_id = space_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(RELOCATION_DELETE, params![space_id]).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Deserialize a cached entry, treating corruption as a miss.
///
/// The cache is a fallback replica of re-fetchable data; a payload that no
/// longer parses must degrade to "nothing cached", not break reads.
fn parse_payload(space_id: &str, payload: &str) -> Option<CachedBlockedSlots> {
    match serde_json::from_str(payload) {
        Ok(entry) => Some(entry),
        Err(err) => {
            warn!(space_id, error = %err, "discarding unreadable blocked-slot cache entry");
            None
        }
    }
}

fn map_sql_error(err: rusqlite::Error) -> PalcoError {
    PalcoError::from(InfraError::from(err))
}

fn map_json_error(err: serde_json::Error) -> PalcoError {
    PalcoError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> PalcoError {
    if err.is_cancelled() {
        PalcoError::Internal("blocking cache task cancelled".into())
    } else {
        PalcoError::Internal(format!("blocking cache task failed: {err}"))
    }
}
