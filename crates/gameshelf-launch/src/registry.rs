//! Active process registry

use crate::{LaunchError, ProcessSpawner, SystemSpawner};
use gameshelf_library::normalize_path;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Tracks which executables are currently running, keyed by normalized path
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone)]
pub struct ProcessRegistry {
    spawner: Arc<dyn ProcessSpawner>,
    active: Arc<Mutex<HashMap<PathBuf, u32>>>,
}

impl std::fmt::Debug for ProcessRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessRegistry")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new(SystemSpawner::new())
    }
}

impl ProcessRegistry {
    pub fn new(spawner: impl ProcessSpawner) -> Self {
        Self {
            spawner: Arc::new(spawner),
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Launch an executable unless it is already running
    ///
    /// A registered entry whose process no longer answers the liveness probe
    /// is evicted and the launch proceeds. Must be called from within a Tokio
    /// runtime. Returns the new process id.
    pub fn launch(&self, exec_path: &str) -> Result<u32, LaunchError> {
        if exec_path.trim().is_empty() {
            return Err(LaunchError::InvalidPath(exec_path.to_string()));
        }

        let path = normalize_path(Path::new(exec_path));
        let mut active = self.active.lock().unwrap();

        if let Some(&pid) = active.get(&path) {
            if self.spawner.is_alive(pid) {
                tracing::info!("{} is already running (pid {})", path.display(), pid);
                return Err(LaunchError::AlreadyRunning(path));
            }
            tracing::debug!("Evicting stale entry for {} (pid {})", path.display(), pid);
            active.remove(&path);
        }

        let spawned = self.spawner.spawn(&path)?;
        let pid = spawned.pid;
        active.insert(path.clone(), pid);
        drop(active);

        let registry = Arc::clone(&self.active);
        tokio::spawn(async move {
            let code = spawned.exit.await.ok().and_then(|report| report.code);

            let mut active = registry.lock().unwrap();
            if active.get(&path) == Some(&pid) {
                active.remove(&path);
            }
            tracing::info!(
                "Game closed (pid {}, exit code {:?}). Removed from active list.",
                pid,
                code
            );
        });

        Ok(pid)
    }

    /// Whether `exec_path` has a registered process
    pub fn is_running(&self, exec_path: &str) -> bool {
        let path = normalize_path(Path::new(exec_path));
        self.active.lock().unwrap().contains_key(&path)
    }

    /// Registered process id for `exec_path`
    pub fn pid_of(&self, exec_path: &str) -> Option<u32> {
        let path = normalize_path(Path::new(exec_path));
        self.active.lock().unwrap().get(&path).copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.lock().unwrap().len()
    }
}
