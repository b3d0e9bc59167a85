//! Configuration structures for the scheduling subsystem

use serde::{Deserialize, Serialize};

/// Remote Schedule Store client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the schedule API, e.g. `https://api.example.com`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Total attempts per request (initial try + retries).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Local cache store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Path of the SQLite cache database file.
    pub path: String,
    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Top-level configuration for the scheduling subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,
    pub cache: CacheConfig,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_pool_size() -> u32 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_take_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "remote": { "base_url": "https://api.example.com" },
                "cache": { "path": "/tmp/palco-cache.db" }
            }"#,
        )
        .expect("config parses");

        assert_eq!(config.remote.timeout_seconds, 30);
        assert_eq!(config.remote.max_attempts, 3);
        assert_eq!(config.cache.pool_size, 4);
    }
}
