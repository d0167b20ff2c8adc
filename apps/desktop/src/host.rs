//! Tauri implementation of the shell's native capabilities.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, PoisonError,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{BlockerId, SessionScope, StorageCategory, ViewportId, ViewportKind},
    error::HostError,
};
use shell_core::{
    DialogPresenter, DialogSeverity, PowerSaveBackend, SessionStorage, ViewportHost,
    ViewportSpec,
};
use tauri::{
    utils::config::BackgroundThrottlingPolicy, AppHandle, Manager, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder,
};
use tracing::{debug, info};
use url::Url;

use crate::{dialogs, permissions, power::DisplaySleepInhibitor};

const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(10);

pub fn viewport_label(kind: ViewportKind, id: ViewportId) -> String {
    format!("{}-{}", kind.as_str(), id)
}

pub fn viewport_id_from_label(label: &str) -> Option<ViewportId> {
    let (kind, id) = label.split_once('-')?;
    if kind != ViewportKind::Setup.as_str() && kind != ViewportKind::Main.as_str() {
        return None;
    }
    id.parse().ok().map(ViewportId)
}

/// Accepts only absolute http(s) addresses.
pub fn parse_server_url(raw: &str) -> Result<Url, HostError> {
    let url = Url::parse(raw).map_err(|err| HostError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HostError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

struct Slot {
    label: String,
    spec: ViewportSpec,
}

/// Windows are reserved by `create_viewport` and built on their first load.
pub struct TauriHost {
    app: AppHandle,
    http: reqwest::Client,
    next_id: AtomicU64,
    slots: Mutex<HashMap<ViewportId, Slot>>,
    inhibitor: DisplaySleepInhibitor,
}

impl TauriHost {
    pub fn new(app: AppHandle) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REACHABILITY_TIMEOUT)
            .build()?;
        let product = app
            .config()
            .product_name
            .clone()
            .unwrap_or_else(|| "CloudTAK".to_string());
        Ok(Self {
            app,
            http,
            next_id: AtomicU64::new(0),
            slots: Mutex::new(HashMap::new()),
            inhibitor: DisplaySleepInhibitor::new(product),
        })
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<ViewportId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn label(&self, id: ViewportId) -> Result<String, HostError> {
        self.slots()
            .get(&id)
            .map(|slot| slot.label.clone())
            .ok_or(HostError::ViewportGone(id))
    }

    fn window(&self, id: ViewportId) -> Option<WebviewWindow> {
        let label = self.label(id).ok()?;
        self.app.get_webview_window(&label)
    }

    fn build_window(&self, id: ViewportId, url: WebviewUrl) -> Result<(), HostError> {
        let (label, spec) = {
            let slots = self.slots();
            let slot = slots.get(&id).ok_or(HostError::ViewportGone(id))?;
            (slot.label.clone(), slot.spec.clone())
        };

        let mut builder = WebviewWindowBuilder::new(&self.app, &label, url)
            .title(&spec.title)
            .inner_size(f64::from(spec.width), f64::from(spec.height));
        if !spec.background_throttling {
            builder = builder.background_throttling(BackgroundThrottlingPolicy::Disabled);
        }
        let window = builder
            .build()
            .map_err(|err| HostError::platform(format!("failed to open {label}: {err}")))?;

        if let Some(gate) = spec.permissions {
            permissions::install(&window, gate);
        }
        info!(%label, "window opened");
        Ok(())
    }

    async fn check_reachable(&self, url: &Url) -> Result<(), HostError> {
        // Any HTTP response counts; only transport failures mean the host is unreachable.
        self.http
            .get(url.clone())
            .send()
            .await
            .map(|response| debug!(%url, status = %response.status(), "server reachable"))
            .map_err(|err| HostError::Unreachable {
                url: url.to_string(),
                reason: err.to_string(),
            })
    }

    fn scoped_window(&self, scope: &SessionScope) -> Option<WebviewWindow> {
        match scope {
            SessionScope::Viewport(id) => self.window(*id),
            // Every webview shares the default data store, so any open one reaches it.
            SessionScope::Default => self.app.webview_windows().into_values().next(),
        }
    }

    fn clear_browsing_data(&self, scope: &SessionScope) -> Result<(), HostError> {
        let Some(window) = self.scoped_window(scope) else {
            debug!(?scope, "no webview open for scope; nothing to clear");
            return Ok(());
        };
        window
            .clear_all_browsing_data()
            .map_err(|err| HostError::platform(err.to_string()))
    }
}

#[async_trait]
impl ViewportHost for TauriHost {
    async fn create_viewport(&self, spec: &ViewportSpec) -> Result<ViewportId, HostError> {
        let id = ViewportId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let label = viewport_label(spec.kind, id);
        self.slots().insert(
            id,
            Slot {
                label,
                spec: spec.clone(),
            },
        );
        Ok(id)
    }

    async fn load_local(&self, id: ViewportId, document: &str) -> Result<(), HostError> {
        if self.app.asset_resolver().get(document.to_string()).is_none() {
            return Err(HostError::SetupAssetMissing {
                document: document.to_string(),
            });
        }
        if self.window(id).is_some() {
            return Ok(());
        }
        self.build_window(id, WebviewUrl::App(document.into()))
    }

    async fn load_url(&self, id: ViewportId, url: &str) -> Result<(), HostError> {
        let parsed = parse_server_url(url)?;
        self.check_reachable(&parsed).await?;

        match self.window(id) {
            Some(mut window) => window
                .navigate(parsed)
                .map_err(|err| HostError::platform(err.to_string())),
            None => self.build_window(id, WebviewUrl::External(parsed)),
        }
    }

    fn focus(&self, id: ViewportId) {
        if let Some(window) = self.window(id) {
            let _ = window.unminimize();
            if let Err(err) = window.set_focus() {
                debug!(viewport = %id, %err, "failed to focus window");
            }
        }
    }

    fn close(&self, id: ViewportId) {
        let window = self.window(id);
        self.slots().remove(&id);
        if let Some(window) = window {
            if let Err(err) = window.close() {
                debug!(viewport = %id, %err, "failed to close window");
            }
        }
    }
}

#[async_trait]
impl SessionStorage for TauriHost {
    async fn clear_cache(&self, scope: &SessionScope) -> Result<(), HostError> {
        self.clear_browsing_data(scope)
    }

    // The webview only exposes an all-or-nothing clear, which covers every category.
    async fn clear_storage_data(
        &self,
        scope: &SessionScope,
        categories: &[StorageCategory],
    ) -> Result<(), HostError> {
        debug!(
            ?scope,
            categories = ?categories.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            "clearing storage data"
        );
        self.clear_browsing_data(scope)
    }
}

impl PowerSaveBackend for TauriHost {
    fn start_blocker(&self) -> Result<BlockerId, HostError> {
        self.inhibitor.start()
    }

    fn is_started(&self, id: BlockerId) -> bool {
        self.inhibitor.is_started(id)
    }

    fn stop_blocker(&self, id: BlockerId) {
        self.inhibitor.stop(id)
    }
}

impl DialogPresenter for TauriHost {
    fn show_error(&self, severity: DialogSeverity, title: &str, message: &str) {
        dialogs::show_error(severity, title, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_to_viewport_ids() {
        let label = viewport_label(ViewportKind::Main, ViewportId(7));
        assert_eq!(label, "main-7");
        assert_eq!(viewport_id_from_label(&label), Some(ViewportId(7)));
        assert_eq!(viewport_id_from_label("setup-12"), Some(ViewportId(12)));
    }

    #[test]
    fn foreign_labels_are_not_viewports() {
        assert_eq!(viewport_id_from_label("main"), None);
        assert_eq!(viewport_id_from_label("devtools-3"), None);
        assert_eq!(viewport_id_from_label("main-x"), None);
    }

    #[test]
    fn server_urls_must_be_http() {
        assert!(parse_server_url("https://tak.example.com").is_ok());
        assert!(parse_server_url("http://10.0.0.5:8080/").is_ok());
        assert!(matches!(
            parse_server_url("tak.example.com"),
            Err(HostError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_server_url("file:///etc/passwd"),
            Err(HostError::InvalidUrl { .. })
        ));
    }
}
