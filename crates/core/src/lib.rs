//! # Palco Core
//!
//! Pure scheduling logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The canonical daily slot grid and week-window reconciliation
//! - The availability resolver and slot selection session
//! - Port/adapter interfaces (traits) for the Remote Schedule Store and the
//!   local blocked-slot cache
//! - The `BlockedSlotStore` service orchestrating both replicas
//!
//! ## Architecture Principles
//! - Only depends on `palco-domain`
//! - No database or HTTP code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod availability;
pub mod scheduling;
pub mod selection;
pub mod time_grid;
pub mod week;

// Re-export specific items to avoid ambiguity
pub use availability::resolve;
pub use scheduling::ops::{OperationKind, OperationTracker};
pub use scheduling::ports::{BlockedSlotCache, RemoteScheduleStore};
pub use scheduling::service::BlockedSlotStore;
pub use selection::{SessionState, SlotSelectionSession, ToggleOutcome};
pub use time_grid::{daily_slots, display_form};
pub use week::{iso_date, long_date, week_window, weekday_index_of};
