use rfd::{MessageButtons, MessageDialog, MessageLevel};
use shell_core::DialogSeverity;

fn error_dialog(title: &str, message: &str) -> MessageDialog {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
}

pub fn show_error(severity: DialogSeverity, title: &str, message: &str) {
    match severity {
        DialogSeverity::Blocking => {
            error_dialog(title, message).show();
        }
        DialogSeverity::NonBlocking => {
            let title = title.to_string();
            let message = message.to_string();
            std::thread::spawn(move || {
                error_dialog(&title, &message).show();
            });
        }
    }
}
