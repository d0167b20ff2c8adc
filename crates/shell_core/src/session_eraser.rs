use std::sync::Arc;

use shared::domain::{SessionScope, StorageCategory};
use tracing::{info, warn};

use crate::host::SessionStorage;

/// Wipes cached browser-session state ahead of a server change.
///
/// Erasure is best effort: failures are logged and never stop the caller, because a stale
/// cache can be fixed with a reload while a blocked transition cannot.
#[derive(Clone)]
pub struct SessionEraser {
    storage: Arc<dyn SessionStorage>,
}

impl SessionEraser {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub async fn erase(&self, scope: &SessionScope) {
        let (cache, storage) = futures::join!(
            self.storage.clear_cache(scope),
            self.storage.clear_storage_data(scope, StorageCategory::ALL)
        );

        let mut clean = true;
        if let Err(err) = cache {
            clean = false;
            warn!(?scope, %err, "failed to clear session cache");
        }
        if let Err(err) = storage {
            clean = false;
            warn!(?scope, %err, "failed to clear session storage data");
        }

        if clean {
            info!(?scope, "cleared browser session state");
        }
    }
}
