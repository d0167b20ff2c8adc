//! Recording fake of the native host used by unit tests.

use std::{
    collections::{HashMap, HashSet},
    env,
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use shared::{
    domain::{BlockerId, SessionScope, StorageCategory, ViewportId, ViewportKind},
    error::HostError,
};
use tokio::sync::{Notify, Semaphore};

use crate::{
    host::{DialogPresenter, DialogSeverity, PowerSaveBackend, SessionStorage, ViewportHost},
    viewport::ViewportSpec,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Create { id: ViewportId, kind: ViewportKind },
    LoadLocal { id: ViewportId, document: String },
    LoadUrl { id: ViewportId, url: String },
    Focus(ViewportId),
    Close(ViewportId),
    ClearCache(SessionScope),
    ClearStorage(SessionScope, usize),
    StartBlocker(BlockerId),
    StopBlocker(BlockerId),
    Dialog {
        severity: DialogSeverity,
        title: String,
        message: String,
    },
}

/// Holds `load_url` until released, announcing when a load has started.
pub struct NavigationGate {
    pub started: Notify,
    pub release: Semaphore,
}

#[derive(Default)]
pub struct FakeHost {
    calls: Mutex<Vec<HostCall>>,
    next_id: AtomicU64,
    specs: Mutex<HashMap<ViewportId, ViewportSpec>>,
    blockers: Mutex<HashMap<BlockerId, bool>>,
    failing_urls: Mutex<HashSet<String>>,
    setup_asset_missing: bool,
    fail_erase: bool,
    gate: Option<Arc<NavigationGate>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_setup_asset() -> Self {
        Self {
            setup_asset_missing: true,
            ..Self::default()
        }
    }

    pub fn with_failing_erase() -> Self {
        Self {
            fail_erase: true,
            ..Self::default()
        }
    }

    pub fn with_navigation_gate(gate: Arc<NavigationGate>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn fail_url(&self, url: &str) {
        self.failing_urls.lock().expect("lock").insert(url.to_string());
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("lock").clear();
    }

    pub fn position(&self, predicate: impl Fn(&HostCall) -> bool) -> Option<usize> {
        self.calls().iter().position(predicate)
    }

    pub fn count(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub fn created(&self, kind: ViewportKind) -> usize {
        self.count(|call| matches!(call, HostCall::Create { kind: k, .. } if *k == kind))
    }

    pub fn erase_calls(&self) -> usize {
        self.count(|call| matches!(call, HostCall::ClearCache(_)))
    }

    pub fn loaded_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::LoadUrl { url, .. } => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn dialogs(&self) -> Vec<(DialogSeverity, String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Dialog {
                    severity,
                    title,
                    message,
                } => Some((severity, title, message)),
                _ => None,
            })
            .collect()
    }

    pub fn spec(&self, id: ViewportId) -> Option<ViewportSpec> {
        self.specs.lock().expect("lock").get(&id).cloned()
    }

    /// Simulates the OS ending a blocker behind the shell's back.
    pub fn revoke_blockers(&self) {
        for live in self.blockers.lock().expect("lock").values_mut() {
            *live = false;
        }
    }

    pub fn live_blockers(&self) -> usize {
        self.blockers
            .lock()
            .expect("lock")
            .values()
            .filter(|live| **live)
            .count()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().expect("lock").push(call);
    }
}

#[async_trait]
impl ViewportHost for FakeHost {
    async fn create_viewport(&self, spec: &ViewportSpec) -> Result<ViewportId, HostError> {
        let id = ViewportId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.specs.lock().expect("lock").insert(id, spec.clone());
        self.record(HostCall::Create {
            id,
            kind: spec.kind,
        });
        Ok(id)
    }

    async fn load_local(&self, id: ViewportId, document: &str) -> Result<(), HostError> {
        self.record(HostCall::LoadLocal {
            id,
            document: document.to_string(),
        });
        if self.setup_asset_missing {
            return Err(HostError::SetupAssetMissing {
                document: document.to_string(),
            });
        }
        Ok(())
    }

    async fn load_url(&self, id: ViewportId, url: &str) -> Result<(), HostError> {
        self.record(HostCall::LoadUrl {
            id,
            url: url.to_string(),
        });
        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            let permit = gate.release.acquire().await.expect("gate open");
            permit.forget();
        }
        if self.failing_urls.lock().expect("lock").contains(url) {
            return Err(HostError::Unreachable {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn focus(&self, id: ViewportId) {
        self.record(HostCall::Focus(id));
    }

    fn close(&self, id: ViewportId) {
        self.record(HostCall::Close(id));
    }
}

#[async_trait]
impl SessionStorage for FakeHost {
    async fn clear_cache(&self, scope: &SessionScope) -> Result<(), HostError> {
        self.record(HostCall::ClearCache(*scope));
        if self.fail_erase {
            return Err(HostError::platform("cache locked"));
        }
        Ok(())
    }

    async fn clear_storage_data(
        &self,
        scope: &SessionScope,
        categories: &[StorageCategory],
    ) -> Result<(), HostError> {
        self.record(HostCall::ClearStorage(*scope, categories.len()));
        if self.fail_erase {
            return Err(HostError::platform("storage locked"));
        }
        Ok(())
    }
}

impl PowerSaveBackend for FakeHost {
    fn start_blocker(&self) -> Result<BlockerId, HostError> {
        let id = BlockerId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.blockers.lock().expect("lock").insert(id, true);
        self.record(HostCall::StartBlocker(id));
        Ok(id)
    }

    fn is_started(&self, id: BlockerId) -> bool {
        self.blockers
            .lock()
            .expect("lock")
            .get(&id)
            .copied()
            .unwrap_or(false)
    }

    fn stop_blocker(&self, id: BlockerId) {
        if let Some(live) = self.blockers.lock().expect("lock").get_mut(&id) {
            *live = false;
        }
        self.record(HostCall::StopBlocker(id));
    }
}

impl DialogPresenter for FakeHost {
    fn show_error(&self, severity: DialogSeverity, title: &str, message: &str) {
        self.record(HostCall::Dialog {
            severity,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

pub fn temp_data_dir(tag: &str) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let seq = COUNTER.fetch_add(1, Ordering::SeqCst);
    env::temp_dir().join(format!("cloudtak_shell_{tag}_{suffix}_{seq}"))
}
