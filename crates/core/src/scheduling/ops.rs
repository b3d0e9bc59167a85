//! In-flight operation tracking
//!
//! One scheduling operation is logically in flight per `(space, kind)` at a
//! time: starting a new one cancels the prior token, so a superseded load
//! can neither return stale data to the screen nor overwrite the cache.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::debug;

/// The scheduling operations tracked per space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Load,
    Block,
    Relocate,
}

impl OperationKind {
    fn label(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Block => "block",
            Self::Relocate => "relocate",
        }
    }
}

/// Registry of cancellation tokens keyed by `(space_id, operation kind)`.
#[derive(Debug, Default)]
pub struct OperationTracker {
    in_flight: Mutex<HashMap<(String, OperationKind), CancellationToken>>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new operation, cancelling any prior one with the same key.
    pub fn begin(&self, space_id: &str, kind: OperationKind) -> OperationGuard {
        let token = CancellationToken::new();
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = in_flight.insert((space_id.to_string(), kind), token.clone()) {
            if !previous.is_cancelled() {
                debug!(space_id, kind = kind.label(), "cancelling superseded operation");
                previous.cancel();
            }
        }

        OperationGuard { token }
    }
}

/// Handle held by one running operation.
pub struct OperationGuard {
    token: CancellationToken,
}

impl OperationGuard {
    /// Resolves when a newer operation with the same key supersedes this
    /// one.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
