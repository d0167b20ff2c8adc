//! Display-sleep inhibition backed by a long-running helper process.

use std::{
    collections::HashMap,
    process::{Child, Command, Stdio},
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use shared::{domain::BlockerId, error::HostError};
use tracing::{debug, warn};

/// Helper command that keeps the display awake for as long as it runs.
pub fn inhibitor_argv(app_name: &str) -> Option<Vec<String>> {
    if cfg!(target_os = "linux") {
        Some(vec![
            "systemd-inhibit".to_string(),
            "--what=idle".to_string(),
            format!("--who={app_name}"),
            "--why=Keeping the display awake".to_string(),
            "--mode=block".to_string(),
            "sleep".to_string(),
            "infinity".to_string(),
        ])
    } else if cfg!(target_os = "macos") {
        Some(vec!["caffeinate".to_string(), "-d".to_string()])
    } else {
        None
    }
}

/// Each blocker is a child process; a blocker is live while its process is running, so
/// one killed from outside is reported as stopped.
pub struct DisplaySleepInhibitor {
    argv: Option<Vec<String>>,
    next_id: AtomicU64,
    children: Mutex<HashMap<BlockerId, Child>>,
}

impl DisplaySleepInhibitor {
    pub fn new(app_name: impl AsRef<str>) -> Self {
        Self::with_argv(inhibitor_argv(app_name.as_ref()))
    }

    pub fn with_argv(argv: Option<Vec<String>>) -> Self {
        Self {
            argv,
            next_id: AtomicU64::new(0),
            children: Mutex::new(HashMap::new()),
        }
    }

    fn children(&self) -> MutexGuard<'_, HashMap<BlockerId, Child>> {
        self.children.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self) -> Result<BlockerId, HostError> {
        let Some((program, args)) = self.argv.as_ref().and_then(|argv| argv.split_first()) else {
            return Err(HostError::platform(
                "display sleep inhibition is not supported on this platform",
            ));
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| HostError::platform(format!("failed to spawn {program}: {err}")))?;

        let id = BlockerId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        debug!(blocker = %id, pid = child.id(), "inhibitor started");
        self.children().insert(id, child);
        Ok(id)
    }

    pub fn is_started(&self, id: BlockerId) -> bool {
        self.children()
            .get_mut(&id)
            .is_some_and(|child| matches!(child.try_wait(), Ok(None)))
    }

    pub fn stop(&self, id: BlockerId) {
        let Some(mut child) = self.children().remove(&id) else {
            return;
        };
        if let Err(err) = child.kill() {
            debug!(blocker = %id, %err, "inhibitor already exited");
        }
        if let Err(err) = child.wait() {
            warn!(blocker = %id, %err, "failed to reap inhibitor");
        }
    }
}

impl Drop for DisplaySleepInhibitor {
    fn drop(&mut self) {
        for (_, mut child) in self.children().drain() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
