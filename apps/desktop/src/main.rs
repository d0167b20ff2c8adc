// Prevents an extra console window on Windows in release builds.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod commands;
mod dialogs;
mod host;
mod menu;
mod paths;
mod permissions;
mod power;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use shell_core::{ConfigStore, ShellBranding, ShellController, ShellEvent, ShellHandle};
use tauri::{Manager, RunEvent, Window, WindowEvent};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::host::TauriHost;

#[derive(Parser, Debug)]
#[command(name = "cloudtak-desktop", version, about = "CloudTAK desktop shell")]
struct Args {
    /// Directory holding config.json.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Tracing filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_filter: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let data_dir = paths::resolve_data_dir(args.data_dir)?;
    info!(data_dir = %data_dir.display(), "starting CloudTAK desktop shell");

    let app = tauri::Builder::default()
        .menu(menu::build)
        .on_menu_event(menu::handle)
        .invoke_handler(tauri::generate_handler![commands::save_url])
        .setup(move |app| {
            let host = Arc::new(TauriHost::new(app.handle().clone())?);
            let controller = ShellController::new(
                host,
                ConfigStore::in_dir(&data_dir),
                ShellBranding::default(),
            );
            app.manage(ShellHandle::new(controller));

            spawn_entry(app.handle(), ShellEvent::Launch);
            Ok(())
        })
        .on_window_event(forward_window_event)
        .build(tauri::generate_context!())
        .context("failed to build tauri application")?;

    app.run(|app, event| match event {
        // The runtime asks to exit when the last window closes; a dock platform stays up so
        // activation can reopen the shell. Explicit exits carry a code and always proceed.
        RunEvent::ExitRequested { code: None, api, .. }
            if keeps_running_without_windows(std::env::consts::OS) =>
        {
            debug!("last window closed; staying resident");
            api.prevent_exit();
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => spawn_entry(app, ShellEvent::Activated),
        RunEvent::Exit => {
            if let Some(shell) = app.try_state::<ShellHandle>() {
                tauri::async_runtime::block_on(shell.dispatch(ShellEvent::Shutdown));
            }
        }
        _ => {}
    });

    Ok(())
}

fn forward_window_event(window: &Window, event: &WindowEvent) {
    let WindowEvent::Destroyed = event else {
        return;
    };
    let Some(id) = host::viewport_id_from_label(window.label()) else {
        return;
    };
    let Some(shell) = window.try_state::<ShellHandle>() else {
        return;
    };

    let shell = shell.inner().clone();
    let app = window.app_handle().clone();
    tauri::async_runtime::spawn(async move {
        shell.dispatch(ShellEvent::ViewportClosed(id)).await;
        if app.webview_windows().is_empty() {
            shell.dispatch(ShellEvent::AllViewportsClosed).await;
        }
    });
}

/// Dock platforms keep the process alive with no window open.
fn keeps_running_without_windows(os: &str) -> bool {
    os == "macos"
}

/// Enters the shell from the stored configuration. When that leaves no viewport open, e.g.
/// because the setup document is missing, a platform without a dock exits instead of idling
/// with no window to close.
fn spawn_entry(app: &tauri::AppHandle, event: ShellEvent) {
    let Some(shell) = app.try_state::<ShellHandle>() else {
        return;
    };
    let shell = shell.inner().clone();
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        let state = shell.dispatch(event).await;
        debug!(?state, "shell entry complete");
        if shell.is_windowless().await && !keeps_running_without_windows(std::env::consts::OS)
        {
            info!(?state, "no viewport could be opened; exiting");
            app.exit(0);
        }
    });
}

pub(crate) fn spawn_dispatch(app: &tauri::AppHandle, event: ShellEvent) {
    let Some(shell) = app.try_state::<ShellHandle>() else {
        return;
    };
    let shell = shell.inner().clone();
    tauri::async_runtime::spawn(async move {
        shell.dispatch(event).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_macos_outlives_its_last_window() {
        assert!(keeps_running_without_windows("macos"));
        assert!(!keeps_running_without_windows("linux"));
        assert!(!keeps_running_without_windows("windows"));
    }

    #[test]
    fn data_dir_flag_is_parsed() {
        let args = Args::try_parse_from(["cloudtak-desktop", "--data-dir", "/tmp/cloudtak"])
            .expect("parse");
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/cloudtak")));
        assert_eq!(args.log_filter, "info");
    }
}
