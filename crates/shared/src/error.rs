use thiserror::Error;

use crate::domain::ViewportId;

/// Failure reported by a native host capability (viewports, session storage, power, dialogs).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("setup document '{document}' is not packaged with this build")]
    SetupAssetMissing { document: String },
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{url} is unreachable: {reason}")]
    Unreachable { url: String, reason: String },
    #[error("viewport {0} no longer exists")]
    ViewportGone(ViewportId),
    #[error("platform error: {0}")]
    Platform(String),
}

impl HostError {
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform(message.into())
    }
}
