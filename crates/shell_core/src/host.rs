//! Native capabilities the shell depends on.

use async_trait::async_trait;
use shared::{
    domain::{BlockerId, SessionScope, StorageCategory, ViewportId},
    error::HostError,
};

use crate::viewport::ViewportSpec;

#[async_trait]
pub trait ViewportHost: Send + Sync {
    /// Reserves a native viewport for `spec`. Content is attached by the first load call.
    async fn create_viewport(&self, spec: &ViewportSpec) -> Result<ViewportId, HostError>;
    async fn load_local(&self, id: ViewportId, document: &str) -> Result<(), HostError>;
    async fn load_url(&self, id: ViewportId, url: &str) -> Result<(), HostError>;
    fn focus(&self, id: ViewportId);
    fn close(&self, id: ViewportId);

    fn session_scope(&self, id: ViewportId) -> SessionScope {
        SessionScope::Viewport(id)
    }
}

#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn clear_cache(&self, scope: &SessionScope) -> Result<(), HostError>;
    async fn clear_storage_data(
        &self,
        scope: &SessionScope,
        categories: &[StorageCategory],
    ) -> Result<(), HostError>;
}

pub trait PowerSaveBackend: Send + Sync {
    fn start_blocker(&self) -> Result<BlockerId, HostError>;
    fn is_started(&self, id: BlockerId) -> bool;
    fn stop_blocker(&self, id: BlockerId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSeverity {
    /// Modal; the caller waits for the user to dismiss it.
    Blocking,
    NonBlocking,
}

pub trait DialogPresenter: Send + Sync {
    fn show_error(&self, severity: DialogSeverity, title: &str, message: &str);
}

/// Everything a [`crate::ShellController`] needs from the platform.
pub trait ShellHost: ViewportHost + SessionStorage + PowerSaveBackend + DialogPresenter {}

impl<T> ShellHost for T where T: ViewportHost + SessionStorage + PowerSaveBackend + DialogPresenter {}
