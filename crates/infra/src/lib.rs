//! # Palco Infra
//!
//! Infrastructure adapters for the Palco scheduling subsystem.
//!
//! This crate contains:
//! - The reqwest-backed HTTP client with timeout and retry support
//! - The Remote Schedule Store client with defensive payload parsing
//! - The SQLite-backed local blocked-slot cache
//! - Configuration loading and adapter wiring
//!
//! ## Architecture
//! - Implements the port traits defined in `palco-core`
//! - External failures are converted into the domain error taxonomy at this
//!   boundary; reqwest/rusqlite errors never leak upward

pub mod cache;
pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod remote;

// Re-export the main adapter surface
pub use cache::{CacheManager, SqliteBlockedSlotCache};
pub use context::ScheduleContext;
pub use errors::InfraError;
pub use http::HttpClient;
pub use remote::HttpRemoteScheduleStore;
