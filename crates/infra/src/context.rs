//! Scheduling context - dependency wiring
//!
//! Builds the concrete adapters out of a [`Config`] and assembles them into
//! a ready-to-use [`BlockedSlotStore`]. This subsystem has no process
//! boundary of its own; the consuming application holds one context per
//! runtime and hands the store to its screens.

use std::sync::Arc;
use std::time::Duration;

use palco_core::BlockedSlotStore;
use palco_domain::{Config, Result};
use tracing::info;

use crate::cache::{CacheManager, SqliteBlockedSlotCache};
use crate::http::HttpClient;
use crate::remote::HttpRemoteScheduleStore;

/// Scheduling context - holds the wired services.
pub struct ScheduleContext {
    pub config: Config,
    pub db: Arc<CacheManager>,
    pub store: Arc<BlockedSlotStore>,
}

impl ScheduleContext {
    /// Wire the full adapter stack from configuration.
    ///
    /// Runs the cache schema migrations as part of initialisation, so a
    /// returned context is ready for use.
    pub fn initialise(config: Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.remote.timeout_seconds))
            .max_attempts(config.remote.max_attempts)
            .user_agent(concat!("palco-scheduling/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let remote =
            Arc::new(HttpRemoteScheduleStore::new(http, config.remote.base_url.clone()));

        let db = Arc::new(CacheManager::new(&config.cache.path, config.cache.pool_size)?);
        db.run_migrations()?;
        let cache = Arc::new(SqliteBlockedSlotCache::new(Arc::clone(&db)));

        let store = Arc::new(BlockedSlotStore::new(remote, cache));

        info!(
            base_url = %config.remote.base_url,
            cache_path = %config.cache.path,
            "schedule context initialised"
        );

        Ok(Self { config, db, store })
    }
}
