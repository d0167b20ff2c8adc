//! Session lifecycle of the CloudTAK desktop shell.
//!
//! The shell shows either a local setup surface or the hosted remote application. Native
//! windows, browsing-data clearing, display-sleep inhibition and dialogs are reached through
//! the capability traits in [`host`], so the state machine in [`controller`] runs unchanged
//! against the Tauri binding or against a test fake.

pub mod config_store;
pub mod controller;
pub mod handle;
pub mod host;
pub mod power_save;
pub mod session_eraser;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use config_store::{ConfigStore, CONFIG_FILE_NAME};
pub use controller::{ShellController, ShellEvent, ShellState};
pub use handle::{ShellHandle, SubmissionOutcome};
pub use host::{
    DialogPresenter, DialogSeverity, PowerSaveBackend, SessionStorage, ShellHost, ViewportHost,
};
pub use power_save::PowerSaveBlockerLifecycle;
pub use session_eraser::SessionEraser;
pub use viewport::{
    NavigationOutcome, OpenOutcome, PermissionGate, ShellBranding, ViewportLifecycle,
    ViewportSpec,
};
