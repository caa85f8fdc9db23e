//! Process spawning capability

use crate::LaunchError;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::sync::oneshot;

/// How a launched process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    /// Exit code, `None` when killed by a signal or the wait failed
    pub code: Option<i32>,
}

/// A freshly spawned process
#[derive(Debug)]
pub struct SpawnedProcess {
    pub pid: u32,

    /// Resolves once the process has exited
    pub exit: oneshot::Receiver<ExitReport>,
}

/// Starts processes and probes whether they are still alive
pub trait ProcessSpawner: Send + Sync + 'static {
    /// Start `path` without waiting for it
    fn spawn(&self, path: &Path) -> Result<SpawnedProcess, LaunchError>;

    /// Zero-effect liveness probe
    fn is_alive(&self, pid: u32) -> bool;
}

/// Spawns real OS processes
///
/// `spawn` must be called from within a Tokio runtime; the exit watcher runs
/// as a task on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl SystemSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, path: &Path) -> Result<SpawnedProcess, LaunchError> {
        let mut cmd = tokio::process::Command::new(path);

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());
        cmd.kill_on_drop(false);

        // Own process group, so signals aimed at the launcher skip the game
        #[cfg(unix)]
        cmd.process_group(0);

        tracing::info!("Launching {}", path.display());

        let mut child = cmd
            .spawn()
            .map_err(|e| LaunchError::SpawnFailed(format!("Failed to spawn process: {}", e)))?;

        let pid = child
            .id()
            .ok_or_else(|| LaunchError::SpawnFailed("Process exited before start".into()))?;

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let code = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    tracing::warn!("Waiting on pid {} failed: {}", pid, e);
                    None
                }
            };
            let _ = tx.send(ExitReport { code });
        });

        Ok(SpawnedProcess { pid, exit: rx })
    }

    fn is_alive(&self, pid: u32) -> bool {
        use nix::errno::Errno;
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        let Ok(raw) = i32::try_from(pid) else {
            return false;
        };

        matches!(kill(Pid::from_raw(raw), None), Ok(()) | Err(Errno::EPERM))
    }
}

impl<T: ProcessSpawner> ProcessSpawner for Arc<T> {
    fn spawn(&self, path: &Path) -> Result<SpawnedProcess, LaunchError> {
        (**self).spawn(path)
    }

    fn is_alive(&self, pid: u32) -> bool {
        (**self).is_alive(pid)
    }
}
