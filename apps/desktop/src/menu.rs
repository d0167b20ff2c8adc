use shared::protocol::{ShellCommand, CHANGE_SERVER_MENU_ID};
use shell_core::ShellEvent;
use tauri::{
    menu::{Menu, MenuBuilder, MenuEvent, MenuItemBuilder, SubmenuBuilder},
    AppHandle, Wry,
};

/// File carries the shell's own command; Edit and View are predefined items handled by
/// the webview.
pub fn build(app: &AppHandle) -> tauri::Result<Menu<Wry>> {
    let change_server =
        MenuItemBuilder::with_id(CHANGE_SERVER_MENU_ID, "Change Server URL").build(app)?;

    let file = SubmenuBuilder::new(app, "File")
        .item(&change_server)
        .separator()
        .quit()
        .build()?;
    let edit = SubmenuBuilder::new(app, "Edit")
        .undo()
        .redo()
        .separator()
        .cut()
        .copy()
        .paste()
        .separator()
        .select_all()
        .build()?;
    let view = SubmenuBuilder::new(app, "View").fullscreen().build()?;

    MenuBuilder::new(app)
        .item(&file)
        .item(&edit)
        .item(&view)
        .build()
}

pub fn handle(app: &AppHandle, event: MenuEvent) {
    if let Some(ShellCommand::ChangeServer) = ShellCommand::from_menu_id(event.id().as_ref()) {
        crate::spawn_dispatch(app, ShellEvent::ChangeServerRequested);
    }
}
