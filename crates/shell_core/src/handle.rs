use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::Mutex;
use tracing::warn;

use crate::controller::{ShellController, ShellEvent, ShellState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Applied(ShellState),
    /// Another submission was still being applied.
    IgnoredInFlight,
}

/// Shared entry point into the [`ShellController`] for IPC, menu and window events.
#[derive(Clone)]
pub struct ShellHandle {
    controller: Arc<Mutex<ShellController>>,
    submission_in_flight: Arc<AtomicBool>,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ShellHandle {
    pub fn new(controller: ShellController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            submission_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn submit_setup(&self, url: String) -> SubmissionOutcome {
        if self
            .submission_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("setup submission ignored; previous submission still in flight");
            return SubmissionOutcome::IgnoredInFlight;
        }
        let _in_flight = InFlight(&self.submission_in_flight);

        let mut controller = self.controller.lock().await;
        let state = controller
            .dispatch(ShellEvent::SetupSubmitted(url))
            .await
            .clone();
        SubmissionOutcome::Applied(state)
    }

    pub async fn dispatch(&self, event: ShellEvent) -> ShellState {
        if let ShellEvent::SetupSubmitted(url) = event {
            return match self.submit_setup(url).await {
                SubmissionOutcome::Applied(state) => state,
                SubmissionOutcome::IgnoredInFlight => self.state().await,
            };
        }

        let mut controller = self.controller.lock().await;
        controller.dispatch(event).await.clone()
    }

    pub async fn state(&self) -> ShellState {
        self.controller.lock().await.state().clone()
    }

    /// True when no viewport is open; on platforms without a dock nothing can revive the shell.
    pub async fn is_windowless(&self) -> bool {
        self.controller.lock().await.is_windowless()
    }
}

#[cfg(test)]
#[path = "tests/handle_tests.rs"]
mod tests;
