//! URL-change state machine wiring config, session erasure and viewports together.

use std::sync::Arc;

use shared::domain::{Configuration, ViewportId, ViewportKind};
use tracing::{debug, info};

use crate::{
    config_store::ConfigStore,
    host::ShellHost,
    session_eraser::SessionEraser,
    viewport::{NavigationOutcome, OpenOutcome, ShellBranding, ViewportLifecycle},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellState {
    Unconfigured,
    SettingUp,
    Connecting { url: String },
    Connected { url: String },
    /// Re-navigation failed: the main viewport stays open under a reopened setup viewport.
    RecoveringFromFailedNavigation { url: String },
    /// Configured, but no viewport is open.
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Launch,
    SetupSubmitted(String),
    ChangeServerRequested,
    ViewportClosed(ViewportId),
    AllViewportsClosed,
    /// Desktop activation re-entry (dock click with no windows open).
    Activated,
    Shutdown,
}

pub struct ShellController {
    config: ConfigStore,
    eraser: SessionEraser,
    viewports: ViewportLifecycle,
    state: ShellState,
    current_url: Option<String>,
    /// URL the main viewport last finished loading; lags `current_url` after a failed navigation.
    loaded_url: Option<String>,
}

impl ShellController {
    pub fn new<H>(host: Arc<H>, config: ConfigStore, branding: ShellBranding) -> Self
    where
        H: ShellHost + 'static,
    {
        Self {
            config,
            eraser: SessionEraser::new(host.clone()),
            viewports: ViewportLifecycle::new(host, branding),
            state: ShellState::Unconfigured,
            current_url: None,
            loaded_url: None,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn loaded_url(&self) -> Option<&str> {
        self.loaded_url.as_deref()
    }

    pub fn viewports(&self) -> &ViewportLifecycle {
        &self.viewports
    }

    /// True when no viewport is open, so nothing on screen can drive the shell any further.
    pub fn is_windowless(&self) -> bool {
        !self.viewports.has_any()
    }

    pub async fn dispatch(&mut self, event: ShellEvent) -> &ShellState {
        debug!(?event, state = ?self.state, "shell event");
        match event {
            ShellEvent::Launch => self.enter_from_config().await,
            ShellEvent::SetupSubmitted(url) => self.submit_setup(&url).await,
            ShellEvent::ChangeServerRequested => self.change_server().await,
            ShellEvent::ViewportClosed(id) => self.viewport_closed(id),
            ShellEvent::AllViewportsClosed => {
                self.viewports.all_closed();
                self.loaded_url = None;
                self.state = self.resting_state();
            }
            ShellEvent::Activated => {
                if !self.viewports.has_any() {
                    self.enter_from_config().await;
                }
            }
            ShellEvent::Shutdown => {
                self.viewports.shutdown();
                self.loaded_url = None;
                self.state = ShellState::Idle;
            }
        }
        &self.state
    }

    /// Cold start: never erases, since nothing is being changed.
    async fn enter_from_config(&mut self) {
        let config = self.config.load().await;
        if !config.is_configured() {
            self.current_url = None;
            self.present_setup().await;
            return;
        }

        let url = config.server_url.trim().to_string();
        info!(%url, "connecting to stored server");
        self.current_url = Some(url.clone());
        self.state = ShellState::Connecting { url: url.clone() };

        self.state = match self.viewports.open_main(&url).await {
            OpenOutcome::Created(_) | OpenOutcome::Focused(_) => self.main_loaded(url),
            OpenOutcome::Failed => self.setup_or_resting_state(),
        };
    }

    async fn submit_setup(&mut self, raw: &str) {
        let url = raw.trim();
        if url.is_empty() {
            debug!("ignoring empty setup submission");
            return;
        }
        let url = url.to_string();

        let is_change = self
            .current_url
            .as_deref()
            .is_some_and(|current| current != url);

        // Erase before committing so a failed erase still leaves the old record in place.
        if is_change {
            let scope = self.viewports.main_session_scope();
            info!(?scope, %url, "server changed; erasing browser session");
            self.eraser.erase(&scope).await;
        }

        self.config.save(&Configuration::new(url.clone())).await;
        self.current_url = Some(url.clone());
        self.state = ShellState::Connecting { url: url.clone() };

        if self.viewports.has_main() {
            self.state = match self.viewports.navigate_main(&url).await {
                NavigationOutcome::Loaded => {
                    self.viewports.close_setup();
                    self.main_loaded(url)
                }
                NavigationOutcome::Failed => ShellState::RecoveringFromFailedNavigation { url },
                NavigationOutcome::NoMainViewport => self.setup_or_resting_state(),
            };
        } else {
            self.state = match self.viewports.open_main(&url).await {
                OpenOutcome::Created(_) | OpenOutcome::Focused(_) => {
                    self.viewports.close_setup();
                    self.main_loaded(url)
                }
                OpenOutcome::Failed => self.setup_or_resting_state(),
            };
        }
    }

    async fn change_server(&mut self) {
        info!("change server requested");
        if let OpenOutcome::Failed = self.viewports.open_setup().await {
            return;
        }
        self.state = ShellState::SettingUp;
    }

    async fn present_setup(&mut self) {
        self.state = match self.viewports.open_setup().await {
            OpenOutcome::Failed => self.resting_state(),
            _ => ShellState::SettingUp,
        };
    }

    fn viewport_closed(&mut self, id: ViewportId) {
        match self.viewports.viewport_closed(id) {
            Some(ViewportKind::Main) => {
                info!(viewport = %id, "main viewport closed");
                self.loaded_url = None;
                self.state = self.setup_or_resting_state();
            }
            Some(ViewportKind::Setup) => {
                debug!(viewport = %id, "setup viewport closed");
                self.state = self.resting_state();
            }
            None => debug!(viewport = %id, "ignoring close of untracked viewport"),
        }
    }

    fn main_loaded(&mut self, url: String) -> ShellState {
        self.loaded_url = Some(url.clone());
        ShellState::Connected { url }
    }

    fn setup_or_resting_state(&self) -> ShellState {
        if self.viewports.has_setup() {
            ShellState::SettingUp
        } else {
            self.resting_state()
        }
    }

    /// State implied by the open viewports when no transition is in progress.
    fn resting_state(&self) -> ShellState {
        // A main viewport that never finished loading the configured URL is still connected to
        // whatever it loaded last, not to the persisted one.
        match (&self.loaded_url, &self.current_url, self.viewports.has_main()) {
            (Some(loaded), _, true) => ShellState::Connected { url: loaded.clone() },
            (None, Some(url), true) => ShellState::Connecting { url: url.clone() },
            (_, Some(_), false) => ShellState::Idle,
            (_, None, _) => ShellState::Unconfigured,
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
