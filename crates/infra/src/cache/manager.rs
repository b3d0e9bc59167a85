//! Cache database manager backed by a pooled SQLite connection.

use std::path::{Path, PathBuf};

use palco_domain::{PalcoError, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Connection type handed out by the manager.
pub type CacheConnection = PooledConnection<SqliteConnectionManager>;

/// Database manager that wraps the SQLite connection pool.
pub struct CacheManager {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl CacheManager {
    /// Create a new manager with the given pool size.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        let max_size = pool_size.max(1);
        let manager = SqliteConnectionManager::file(&path);
        let pool = Pool::builder().max_size(max_size).build(manager).map_err(map_pool_error)?;

        info!(
            db_path = %path.display(),
            max_connections = max_size,
            "cache pool initialised"
        );

        Ok(Self { pool, path })
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<CacheConnection> {
        self.pool.get().map_err(map_pool_error)
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, CAST(strftime('%s','now') AS INTEGER))",
            params![SCHEMA_VERSION],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Perform a health check to verify database connectivity.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0))
            .map_err(map_sql_error)?;
        Ok(())
    }
}

fn map_sql_error(err: rusqlite::Error) -> PalcoError {
    PalcoError::from(InfraError::from(err))
}

fn map_pool_error(err: r2d2::Error) -> PalcoError {
    PalcoError::from(InfraError::from(err))
}
