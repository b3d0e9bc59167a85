//! Configuration loader
//!
//! Loads scheduling configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `PALCO_API_BASE_URL`: Base URL of the Remote Schedule Store
//! - `PALCO_HTTP_TIMEOUT_SECS`: Per-request timeout in seconds (default 30)
//! - `PALCO_HTTP_MAX_ATTEMPTS`: Attempts per request incl. retries (default 3)
//! - `PALCO_CACHE_PATH`: SQLite cache database file path
//! - `PALCO_CACHE_POOL_SIZE`: Cache connection pool size (default 4)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./palco.json` or `./palco.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use palco_domain::{CacheConfig, Config, PalcoError, RemoteConfig, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `PalcoError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The base URL and cache path are required; the remaining knobs fall back
/// to their defaults when unset.
///
/// # Errors
/// Returns `PalcoError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("PALCO_API_BASE_URL")?;
    let timeout_seconds = env_u64("PALCO_HTTP_TIMEOUT_SECS", 30)?;
    let max_attempts = env_u64("PALCO_HTTP_MAX_ATTEMPTS", 3)? as u32;

    let cache_path = env_var("PALCO_CACHE_PATH")?;
    let pool_size = env_u64("PALCO_CACHE_POOL_SIZE", 4)? as u32;

    Ok(Config {
        remote: RemoteConfig { base_url, timeout_seconds, max_attempts },
        cache: CacheConfig { path: cache_path, pool_size },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PalcoError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PalcoError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PalcoError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PalcoError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PalcoError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PalcoError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PalcoError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("palco.json"),
            cwd.join("palco.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("palco.json"),
                exe_dir.join("palco.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        PalcoError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an integer environment variable, defaulting when unset.
fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|e| PalcoError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_palco_env() {
        for key in [
            "PALCO_API_BASE_URL",
            "PALCO_HTTP_TIMEOUT_SECS",
            "PALCO_HTTP_MAX_ATTEMPTS",
            "PALCO_CACHE_PATH",
            "PALCO_CACHE_POOL_SIZE",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_palco_env();

        std::env::set_var("PALCO_API_BASE_URL", "https://api.example.com");
        std::env::set_var("PALCO_HTTP_TIMEOUT_SECS", "10");
        std::env::set_var("PALCO_HTTP_MAX_ATTEMPTS", "2");
        std::env::set_var("PALCO_CACHE_PATH", "/tmp/palco-cache.db");
        std::env::set_var("PALCO_CACHE_POOL_SIZE", "8");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load config from env vars, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.remote.base_url, "https://api.example.com");
        assert_eq!(config.remote.timeout_seconds, 10);
        assert_eq!(config.remote.max_attempts, 2);
        assert_eq!(config.cache.path, "/tmp/palco-cache.db");
        assert_eq!(config.cache.pool_size, 8);

        clear_palco_env();
    }

    #[test]
    fn test_load_from_env_uses_defaults_for_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_palco_env();

        std::env::set_var("PALCO_API_BASE_URL", "https://api.example.com");
        std::env::set_var("PALCO_CACHE_PATH", "/tmp/palco-cache.db");

        let config = load_from_env().expect("loads with defaults");
        assert_eq!(config.remote.timeout_seconds, 30);
        assert_eq!(config.remote.max_attempts, 3);
        assert_eq!(config.cache.pool_size, 4);

        clear_palco_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_palco_env();

        let result = load_from_env();
        assert!(result.is_err(), "Should fail with missing env var");

        let err = result.unwrap_err();
        assert!(matches!(err, PalcoError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_palco_env();

        std::env::set_var("PALCO_API_BASE_URL", "https://api.example.com");
        std::env::set_var("PALCO_CACHE_PATH", "/tmp/palco-cache.db");
        std::env::set_var("PALCO_HTTP_TIMEOUT_SECS", "not-a-number");

        let result = load_from_env();
        assert!(result.is_err(), "Should fail with invalid timeout");

        clear_palco_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "remote": {
                "base_url": "https://api.example.com",
                "timeout_seconds": 20,
                "max_attempts": 5
            },
            "cache": {
                "path": "cache.db",
                "pool_size": 2
            }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_ok(), "Should load config from JSON file");

        let config = result.unwrap();
        assert_eq!(config.remote.base_url, "https://api.example.com");
        assert_eq!(config.remote.timeout_seconds, 20);
        assert_eq!(config.cache.pool_size, 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[remote]
base_url = "https://api.example.com"
timeout_seconds = 25

[cache]
path = "cache.db"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_ok(), "Should load config from TOML file");

        let config = result.unwrap();
        assert_eq!(config.remote.timeout_seconds, 25);
        assert_eq!(config.remote.max_attempts, 3, "defaults apply to omitted fields");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(result.is_err(), "Should fail when file not found");

        let err = result.unwrap_err();
        assert!(matches!(err, PalcoError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let invalid_json = r#"{ "this is": "not valid json" "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_json.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_err(), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let content = "some content";
        let path = PathBuf::from("test.yaml");
        let result = parse_config(content, &path);
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
