//! Mock spawner for testing without starting real processes
//!
//! ```no_run
//! use gameshelf_launch::{ProcessRegistry, mock::MockSpawner};
//! use std::sync::Arc;
//!
//! let spawner = Arc::new(MockSpawner::new());
//! let registry = ProcessRegistry::new(Arc::clone(&spawner));
//! ```

use crate::{ExitReport, LaunchError, ProcessSpawner, SpawnedProcess};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tokio::sync::oneshot;

/// In-memory spawner; processes live until told to exit
#[derive(Debug)]
pub struct MockSpawner {
    next_pid: AtomicU32,
    fail_spawns: AtomicBool,
    alive: Mutex<HashSet<u32>>,
    exits: Mutex<HashMap<u32, oneshot::Sender<ExitReport>>>,
    launched: Mutex<Vec<PathBuf>>,
}

impl Default for MockSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSpawner {
    pub fn new() -> Self {
        Self {
            next_pid: AtomicU32::new(1000),
            fail_spawns: AtomicBool::new(false),
            alive: Mutex::new(HashSet::new()),
            exits: Mutex::new(HashMap::new()),
            launched: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent spawns fail
    pub fn set_fail_spawns(&self, fail: bool) {
        self.fail_spawns.store(fail, Ordering::SeqCst);
    }

    /// End a process and deliver its exit notification
    pub fn exit(&self, pid: u32, code: i32) {
        self.alive.lock().unwrap().remove(&pid);
        if let Some(tx) = self.exits.lock().unwrap().remove(&pid) {
            let _ = tx.send(ExitReport { code: Some(code) });
        }
    }

    /// End a process without delivering an exit notification yet
    pub fn vanish(&self, pid: u32) {
        self.alive.lock().unwrap().remove(&pid);
    }

    /// Paths spawned so far, in order
    pub fn launched(&self) -> Vec<PathBuf> {
        self.launched.lock().unwrap().clone()
    }
}

impl ProcessSpawner for MockSpawner {
    fn spawn(&self, path: &Path) -> Result<SpawnedProcess, LaunchError> {
        if self.fail_spawns.load(Ordering::SeqCst) {
            return Err(LaunchError::SpawnFailed(format!(
                "mock spawn of {} refused",
                path.display()
            )));
        }

        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();

        self.alive.lock().unwrap().insert(pid);
        self.exits.lock().unwrap().insert(pid, tx);
        self.launched.lock().unwrap().push(path.to_path_buf());

        Ok(SpawnedProcess { pid, exit: rx })
    }

    fn is_alive(&self, pid: u32) -> bool {
        self.alive.lock().unwrap().contains(&pid)
    }
}
