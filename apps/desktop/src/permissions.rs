//! Installs the hosted-content permission gate on the platform webview.

use shell_core::PermissionGate;
use tauri::WebviewWindow;

#[cfg(target_os = "linux")]
pub fn install(window: &WebviewWindow, gate: PermissionGate) {
    use glib::prelude::*;
    use shared::domain::Permission;
    use tracing::{debug, warn};
    use webkit2gtk::{PermissionRequestExt, WebViewExt};

    fn classify(request: &webkit2gtk::PermissionRequest) -> Permission {
        if request.is::<webkit2gtk::GeolocationPermissionRequest>() {
            Permission::Geolocation
        } else if request.is::<webkit2gtk::NotificationPermissionRequest>() {
            Permission::Notifications
        } else if request.is::<webkit2gtk::UserMediaPermissionRequest>() {
            Permission::Media
        } else {
            Permission::Other(request.type_().name().to_string())
        }
    }

    let installed = window.with_webview(move |webview| {
        webview
            .inner()
            .connect_permission_request(move |_, request| {
                let permission = classify(request);
                let granted = gate.decide(&permission);
                debug!(permission = permission.name(), granted, "permission request");
                if granted {
                    request.allow();
                } else {
                    request.deny();
                }
                true
            });
    });
    if let Err(err) = installed {
        warn!(%err, "failed to install permission gate");
    }
}

#[cfg(not(target_os = "linux"))]
pub fn install(window: &WebviewWindow, gate: PermissionGate) {
    tracing::debug!(
        label = window.label(),
        allowed = ?gate.allowed(),
        "permission prompts handled by the platform webview"
    );
}
