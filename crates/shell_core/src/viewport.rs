//! Creation, focus and teardown of the setup and main viewports.

use std::sync::Arc;

use shared::{
    domain::{Permission, SessionScope, ViewportId, ViewportKind},
    error::HostError,
};
use tracing::{info, warn};

use crate::{
    host::{DialogPresenter, DialogSeverity, PowerSaveBackend, ViewportHost},
    power_save::PowerSaveBlockerLifecycle,
};

const SETUP_SIZE: (u32, u32) = (520, 640);
const MAIN_SIZE: (u32, u32) = (1200, 800);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellBranding {
    pub app_title: String,
    pub setup_title: String,
    /// Bundled document rendered by the setup viewport.
    pub setup_document: String,
}

impl Default for ShellBranding {
    fn default() -> Self {
        Self {
            app_title: "CloudTAK".to_string(),
            setup_title: "CloudTAK Setup".to_string(),
            setup_document: "index.html".to_string(),
        }
    }
}

/// Static allow-list consulted on every permission request from hosted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGate {
    allowed: &'static [&'static str],
}

impl PermissionGate {
    pub const HOSTED_APP: Self = Self {
        allowed: &["geolocation", "notifications", "media"],
    };

    pub fn decide(&self, permission: &Permission) -> bool {
        self.allowed.contains(&permission.name())
    }

    pub fn allowed(&self) -> &'static [&'static str] {
        self.allowed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportSpec {
    pub kind: ViewportKind,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_throttling: bool,
    pub permissions: Option<PermissionGate>,
}

impl ViewportSpec {
    pub fn setup(branding: &ShellBranding) -> Self {
        Self {
            kind: ViewportKind::Setup,
            title: branding.setup_title.clone(),
            width: SETUP_SIZE.0,
            height: SETUP_SIZE.1,
            background_throttling: true,
            permissions: None,
        }
    }

    /// The hosted app may do real-time work while unfocused, so it is never throttled.
    pub fn main(branding: &ShellBranding) -> Self {
        Self {
            kind: ViewportKind::Main,
            title: branding.app_title.clone(),
            width: MAIN_SIZE.0,
            height: MAIN_SIZE.1,
            background_throttling: false,
            permissions: Some(PermissionGate::HOSTED_APP),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Created(ViewportId),
    Focused(ViewportId),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Loaded,
    Failed,
    NoMainViewport,
}

pub struct ViewportLifecycle {
    host: Arc<dyn ViewportHost>,
    dialogs: Arc<dyn DialogPresenter>,
    power: PowerSaveBlockerLifecycle,
    branding: ShellBranding,
    setup: Option<ViewportId>,
    main: Option<ViewportId>,
}

impl ViewportLifecycle {
    pub fn new<H>(host: Arc<H>, branding: ShellBranding) -> Self
    where
        H: ViewportHost + DialogPresenter + PowerSaveBackend + 'static,
    {
        let power_backend: Arc<dyn PowerSaveBackend> = host.clone();
        let dialogs: Arc<dyn DialogPresenter> = host.clone();
        Self {
            host,
            dialogs,
            power: PowerSaveBlockerLifecycle::new(power_backend),
            branding,
            setup: None,
            main: None,
        }
    }

    pub fn setup_id(&self) -> Option<ViewportId> {
        self.setup
    }

    pub fn main_id(&self) -> Option<ViewportId> {
        self.main
    }

    pub fn has_setup(&self) -> bool {
        self.setup.is_some()
    }

    pub fn has_main(&self) -> bool {
        self.main.is_some()
    }

    pub fn has_any(&self) -> bool {
        self.has_setup() || self.has_main()
    }

    pub fn power_save_active(&self) -> bool {
        self.power.is_active()
    }

    /// Session partition that a server change would affect.
    pub fn main_session_scope(&self) -> SessionScope {
        match self.main {
            Some(id) => self.host.session_scope(id),
            None => SessionScope::Default,
        }
    }

    pub async fn open_setup(&mut self) -> OpenOutcome {
        if let Some(id) = self.setup {
            self.host.focus(id);
            return OpenOutcome::Focused(id);
        }

        let spec = ViewportSpec::setup(&self.branding);
        let id = match self.host.create_viewport(&spec).await {
            Ok(id) => id,
            Err(err) => {
                warn!(%err, "failed to create setup viewport");
                self.dialogs.show_error(
                    DialogSeverity::Blocking,
                    "Setup unavailable",
                    &format!("The setup window could not be opened: {err}"),
                );
                return OpenOutcome::Failed;
            }
        };
        self.setup = Some(id);

        if let Err(err) = self.host.load_local(id, &self.branding.setup_document).await {
            warn!(viewport = %id, %err, "setup document failed to load");
            let (title, message) = match &err {
                HostError::SetupAssetMissing { .. } => (
                    "Setup UI not built",
                    "The setup interface is missing from this build. Build the setup UI and package it with the desktop app before launching.".to_string(),
                ),
                other => ("Setup UI failed to load", other.to_string()),
            };
            self.dialogs.show_error(DialogSeverity::Blocking, title, &message);
            self.host.close(id);
            if self.setup == Some(id) {
                self.setup = None;
            }
            return OpenOutcome::Failed;
        }

        info!(viewport = %id, "setup viewport opened");
        OpenOutcome::Created(id)
    }

    /// Opens the main viewport on `url`. An existing main viewport is only focused.
    ///
    /// If the first load fails the new viewport is torn down and setup is presented.
    pub async fn open_main(&mut self, url: &str) -> OpenOutcome {
        if let Some(id) = self.main {
            self.host.focus(id);
            return OpenOutcome::Focused(id);
        }

        let spec = ViewportSpec::main(&self.branding);
        let id = match self.host.create_viewport(&spec).await {
            Ok(id) => id,
            Err(err) => {
                self.report_load_failure(url, &err);
                self.open_setup().await;
                return OpenOutcome::Failed;
            }
        };
        self.main = Some(id);
        self.power.start();

        if let Err(err) = self.host.load_url(id, url).await {
            self.report_load_failure(url, &err);
            if self.main == Some(id) {
                self.close_main();
            }
            self.open_setup().await;
            return OpenOutcome::Failed;
        }

        info!(viewport = %id, url, "main viewport opened");
        OpenOutcome::Created(id)
    }

    /// Loads `url` into the existing main viewport. On failure the viewport is kept and
    /// setup is presented so the user can correct the address.
    pub async fn navigate_main(&mut self, url: &str) -> NavigationOutcome {
        let Some(id) = self.main else {
            return NavigationOutcome::NoMainViewport;
        };

        match self.host.load_url(id, url).await {
            Ok(()) => {
                info!(viewport = %id, url, "main viewport navigated");
                NavigationOutcome::Loaded
            }
            Err(err) => {
                self.report_load_failure(url, &err);
                self.open_setup().await;
                NavigationOutcome::Failed
            }
        }
    }

    pub fn close_setup(&mut self) {
        if let Some(id) = self.setup.take() {
            self.host.close(id);
        }
    }

    pub fn close_main(&mut self) {
        if let Some(id) = self.main.take() {
            self.host.close(id);
        }
        self.power.stop();
    }

    /// Drops the identity of a viewport the platform reports as closed.
    pub fn viewport_closed(&mut self, id: ViewportId) -> Option<ViewportKind> {
        if self.setup == Some(id) {
            self.setup = None;
            return Some(ViewportKind::Setup);
        }
        if self.main == Some(id) {
            self.main = None;
            self.power.stop();
            return Some(ViewportKind::Main);
        }
        None
    }

    pub fn all_closed(&mut self) {
        self.setup = None;
        self.main = None;
        self.power.stop();
    }

    pub fn shutdown(&mut self) {
        self.power.stop();
    }

    fn report_load_failure(&self, url: &str, err: &HostError) {
        warn!(url, %err, "failed to load url");
        self.dialogs.show_error(
            DialogSeverity::NonBlocking,
            "Error loading URL",
            &format!("Failed to load {url}: {err}"),
        );
    }
}

#[cfg(test)]
#[path = "tests/viewport_tests.rs"]
mod tests;
