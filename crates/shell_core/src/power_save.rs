use std::sync::Arc;

use shared::domain::BlockerId;
use tracing::{debug, warn};

use crate::host::PowerSaveBackend;

/// Keeps the display awake while the hosted application is shown.
///
/// Holds at most one blocker. Liveness is always re-queried from the backend, so a blocker
/// revoked outside the shell is replaced on the next `start`.
pub struct PowerSaveBlockerLifecycle {
    backend: Arc<dyn PowerSaveBackend>,
    blocker: Option<BlockerId>,
}

impl PowerSaveBlockerLifecycle {
    pub fn new(backend: Arc<dyn PowerSaveBackend>) -> Self {
        Self {
            backend,
            blocker: None,
        }
    }

    pub fn start(&mut self) {
        if self.is_active() {
            return;
        }
        if let Some(stale) = self.blocker.take() {
            debug!(blocker = %stale, "display sleep blocker revoked; releasing it");
            self.backend.stop_blocker(stale);
        }

        match self.backend.start_blocker() {
            Ok(id) => {
                debug!(blocker = %id, "display sleep blocked");
                self.blocker = Some(id);
            }
            Err(err) => {
                warn!(%err, "failed to block display sleep");
                self.blocker = None;
            }
        }
    }

    pub fn stop(&mut self) {
        // A revoked blocker still holds backend resources.
        if let Some(id) = self.blocker.take() {
            self.backend.stop_blocker(id);
            debug!(blocker = %id, "display sleep unblocked");
        }
    }

    pub fn is_active(&self) -> bool {
        self.blocker.is_some_and(|id| self.backend.is_started(id))
    }
}

#[cfg(test)]
#[path = "tests/power_save_tests.rs"]
mod tests;
