//! Install size estimation
//!
//! Sums regular-file sizes below the directory that contains a game's
//! executable. The walk is best effort: symlinks are never followed,
//! skip-listed directories and anything past the depth limit count as zero,
//! and unreadable entries are logged and counted as zero. Entries of one
//! directory are measured concurrently and joined before the level returns.

use crate::{LibraryError, normalize_path};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, join_all};
use gameshelf_config::InstallSizeConfig;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs::{self, DirEntry};

/// Install size estimator
#[derive(Debug, Clone)]
pub struct InstallSizeEstimator {
    max_depth: usize,
    /// Lowercased directory names
    skip_dirs: HashSet<String>,
}

impl Default for InstallSizeEstimator {
    fn default() -> Self {
        Self::from_config(&InstallSizeConfig::default())
    }
}

impl InstallSizeEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &InstallSizeConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            skip_dirs: config.skip_dirs.iter().map(|d| d.to_lowercase()).collect(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Size of the directory tree containing `exec_path`
    pub async fn estimate(&self, exec_path: &str) -> Result<u64, LibraryError> {
        if exec_path.trim().is_empty() {
            return Err(LibraryError::InvalidPath(exec_path.to_string()));
        }

        let path = normalize_path(Path::new(exec_path));
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(LibraryError::PathNotFound(path));
        }

        let root = match path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
            Some(parent) => parent.to_path_buf(),
            None => return Err(LibraryError::InvalidPath(exec_path.to_string())),
        };

        tracing::info!("Calculating install size for: {}", root.display());
        let start = Instant::now();

        let total = self.directory_size(&root).await;

        tracing::info!(
            "Size calculation completed in {:?}: {} bytes",
            start.elapsed(),
            total
        );
        Ok(total)
    }

    /// Total size of a directory tree; never fails
    pub async fn directory_size(&self, root: &Path) -> u64 {
        self.walk(root.to_path_buf(), 0).await
    }

    fn is_skipped(&self, name: &OsStr) -> bool {
        self.skip_dirs
            .contains(&name.to_string_lossy().to_lowercase())
    }

    fn walk(&self, dir: PathBuf, depth: usize) -> BoxFuture<'_, u64> {
        async move {
            if depth > self.max_depth {
                tracing::warn!("Max depth reached at: {}", dir.display());
                return 0;
            }

            let mut reader = match fs::read_dir(&dir).await {
                Ok(reader) => reader,
                Err(e) => {
                    tracing::error!("Error reading directory {}: {}", dir.display(), e);
                    return 0;
                }
            };

            let mut entries = Vec::new();
            loop {
                match reader.next_entry().await {
                    Ok(Some(entry)) => entries.push(entry),
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("Could not list {}: {}", dir.display(), e);
                        break;
                    }
                }
            }

            join_all(entries.into_iter().map(|entry| self.entry_size(entry, depth)))
                .await
                .into_iter()
                .sum()
        }
        .boxed()
    }

    async fn entry_size(&self, entry: DirEntry, depth: usize) -> u64 {
        let path = entry.path();

        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            Err(e) => {
                tracing::warn!("Could not access: {}: {}", path.display(), e);
                return 0;
            }
        };

        if file_type.is_symlink() {
            return 0;
        }

        if file_type.is_dir() {
            if self.is_skipped(&entry.file_name()) {
                tracing::debug!("Skipping {}", path.display());
                return 0;
            }
            return self.walk(path, depth + 1).await;
        }

        if file_type.is_file() {
            return match fs::symlink_metadata(&path).await {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    tracing::warn!("Could not access: {}: {}", path.display(), e);
                    0
                }
            };
        }

        0
    }
}

/// Human readable byte count, base 1024 with two decimals
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, len: usize) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, vec![0u8; len]).unwrap();
    }

    #[tokio::test]
    async fn test_sums_regular_files() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("game.exe"), 100);
        write(&dir.path().join("data/level1.pak"), 250);
        write(&dir.path().join("data/sub/level2.pak"), 50);

        let exe = dir.path().join("game.exe");
        let size = InstallSizeEstimator::new()
            .estimate(exe.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(size, 400);
    }

    #[tokio::test]
    async fn test_skip_list_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("game.exe"), 10);
        write(&dir.path().join("Cache/shader.bin"), 1000);
        write(&dir.path().join(".git/objects/blob"), 1000);
        write(&dir.path().join("TEMP/x"), 1000);

        let size = InstallSizeEstimator::new().directory_size(dir.path()).await;
        assert_eq!(size, 10);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinks_are_not_followed() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("game.exe"), 10);
        write(&dir.path().join("assets/big.bin"), 500);
        std::os::unix::fs::symlink(dir.path().join("assets"), dir.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("assets/big.bin"),
            dir.path().join("big-link.bin"),
        )
        .unwrap();

        let size = InstallSizeEstimator::new().directory_size(dir.path()).await;
        assert_eq!(size, 510);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_directory_counts_as_zero() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(&dir.path().join("game.exe"), 10);
        write(&dir.path().join("data/level.pak"), 20);
        write(&dir.path().join("locked/save.dat"), 300);

        let locked = dir.path().join("locked");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users can still list it
        let expected = if std::fs::read_dir(&locked).is_ok() {
            330
        } else {
            30
        };

        let size = InstallSizeEstimator::new().directory_size(dir.path()).await;
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(size, expected);
    }

    #[tokio::test]
    async fn test_depth_limit_truncates_branch() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("root.bin"), 1);
        write(&dir.path().join("a/one.bin"), 10);
        write(&dir.path().join("a/b/two.bin"), 100);
        write(&dir.path().join("c/three.bin"), 1000);

        let estimator = InstallSizeEstimator::new().with_max_depth(1);
        let size = estimator.directory_size(dir.path()).await;
        // a/b sits at depth 2 and is dropped; its shallower siblings are not
        assert_eq!(size, 1 + 10 + 1000);
    }

    #[tokio::test]
    async fn test_invalid_and_missing_paths() {
        let estimator = InstallSizeEstimator::new();
        assert!(matches!(
            estimator.estimate("  ").await,
            Err(LibraryError::InvalidPath(_))
        ));
        assert!(matches!(
            estimator.estimate("/definitely/not/here/game.exe").await,
            Err(LibraryError::PathNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_repeat_calls_agree() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("game.exe"), 7);
        write(&dir.path().join("x/y/z.bin"), 9);

        let estimator = InstallSizeEstimator::new();
        let first = estimator.directory_size(dir.path()).await;
        let second = estimator.directory_size(dir.path()).await;
        assert_eq!(first, 16);
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512.00 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.00 GB");
    }
}
