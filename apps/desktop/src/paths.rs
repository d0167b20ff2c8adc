use std::{ffi::OsString, path::PathBuf};

use anyhow::anyhow;

pub const DATA_DIR_ENV: &str = "CLOUDTAK_DESKTOP_DATA_DIR";
const APP_DIR_NAME: &str = "cloudtak-desktop";

/// Resolves where config.json lives: `--data-dir`, then the environment, then the
/// per-user config directory.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    resolve_with(flag, std::env::var_os(DATA_DIR_ENV), dirs::config_dir())
}

fn resolve_with(
    flag: Option<PathBuf>,
    env: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = env.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    config_dir
        .map(|base| base.join(APP_DIR_NAME))
        .ok_or_else(|| anyhow!("unable to resolve per-user config directory; pass --data-dir"))
}
