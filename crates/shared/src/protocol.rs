//! Commands the native menu sends to the shell.

use serde::{Deserialize, Serialize};

/// Menu item id of the "Change Server URL" command.
pub const CHANGE_SERVER_MENU_ID: &str = "change-server";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellCommand {
    ChangeServer,
}

impl ShellCommand {
    pub fn from_menu_id(id: &str) -> Option<Self> {
        (id == CHANGE_SERVER_MENU_ID).then_some(Self::ChangeServer)
    }
}
