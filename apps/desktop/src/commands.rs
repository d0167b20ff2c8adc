//! IPC commands exposed to the local setup surface.

use shell_core::{ShellHandle, SubmissionOutcome};
use tauri::State;
use tracing::debug;

/// Receives the server URL chosen in the setup surface. The reply carries no payload; the
/// outcome is the resulting viewport transition.
#[tauri::command]
pub async fn save_url(url: String, shell: State<'_, ShellHandle>) -> Result<(), String> {
    match shell.submit_setup(url).await {
        SubmissionOutcome::Applied(state) => debug!(?state, "setup submission applied"),
        SubmissionOutcome::IgnoredInFlight => debug!("setup submission dropped"),
    }
    Ok(())
}
