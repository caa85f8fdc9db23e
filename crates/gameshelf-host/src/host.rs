//! The host coordinator
//!
//! Owns every piece of mutable state the UI talks to: the game store, the
//! install size cache, the title index, the active process registry and the
//! navigation history. Built once at startup and torn down at shutdown.

use crate::HostError;
use crate::navigation::{HistorySnapshot, NavigationHistory, NavigationOutcome};
use crate::picker::{FilePicker, PickKind};
use gameshelf_config::{ShelfConfig, ThemeCatalog};
use gameshelf_launch::ProcessRegistry;
use gameshelf_library::{
    GameId, GameMap, GameRecord, GameStore, InstallSizeCache, InstallSizeEstimator, LibraryError,
    ListedGame, SortMode, TitleIndex, TitleMatch, list_games,
};
use std::path::PathBuf;

pub struct Host {
    config: ShelfConfig,
    store: GameStore,
    estimator: InstallSizeEstimator,
    sizes: InstallSizeCache,
    titles: TitleIndex,
    processes: ProcessRegistry,
    history: NavigationHistory,
    picker: FilePicker,
}

impl Host {
    /// Build a host that launches real processes
    pub fn new(config: ShelfConfig) -> Self {
        Self::with_registry(config, ProcessRegistry::default())
    }

    pub fn with_registry(config: ShelfConfig, processes: ProcessRegistry) -> Self {
        let store = GameStore::open(config.library.games_path());
        let estimator = InstallSizeEstimator::from_config(&config.install_size);
        let history = NavigationHistory::new(config.navigation.start_page.clone());
        let picker = FilePicker::from_config(&config.picker);

        let mut host = Self {
            config,
            store,
            estimator,
            sizes: InstallSizeCache::new(),
            titles: TitleIndex::new(),
            processes,
            history,
            picker,
        };
        host.titles = TitleIndex::from_games(&host.load_games());
        host
    }

    /// Seed the data directory, then build the host
    pub fn startup(config: ShelfConfig) -> Result<Self, HostError> {
        config.ensure_data_files()?;
        let host = Self::new(config);
        tracing::info!(
            "Library at {} ({} games)",
            host.store.path().display(),
            host.titles.len()
        );
        Ok(host)
    }

    pub fn config(&self) -> &ShelfConfig {
        &self.config
    }

    /// Every game; an unreadable store is logged and reported as empty
    pub fn load_games(&self) -> GameMap {
        match self.store.load() {
            Ok(games) => games,
            Err(e) => {
                tracing::error!("Error loading games data: {}", e);
                GameMap::new()
            }
        }
    }

    pub fn save_game(&mut self, details: GameRecord) -> Result<GameId, HostError> {
        let title = details.title.clone();
        let id = self.store.add(details)?;
        self.titles.rename(&id, &title);
        Ok(id)
    }

    /// Replace a game's details; a changed path drops its cached size
    pub fn update_game(&mut self, id: &GameId, details: GameRecord) -> Result<(), HostError> {
        let title = details.title.clone();
        let path = details.path.clone();
        let previous = self.store.update(id, details)?;

        if previous.path != path && self.sizes.invalidate(id) {
            tracing::debug!("Install size of game {} invalidated", id);
        }
        self.titles.rename(id, &title);
        Ok(())
    }

    /// Idempotent: removing an unknown id succeeds
    pub fn remove_game(&mut self, id: &GameId) -> Result<(), HostError> {
        self.store.remove(id)?;
        self.sizes.invalidate(id);
        self.titles.remove(id);
        Ok(())
    }

    /// Uncached size of the directory containing `exec_path`
    pub async fn install_size(&self, exec_path: &str) -> Result<u64, HostError> {
        Ok(self.estimator.estimate(exec_path).await?)
    }

    /// Install size of a stored game, computed once and then served from cache
    pub async fn game_install_size(&mut self, id: &GameId) -> Result<u64, HostError> {
        if let Some(size) = self.sizes.get(id) {
            return Ok(size);
        }

        let record = self
            .store
            .get(id)?
            .ok_or_else(|| LibraryError::GameNotFound(id.clone()))?;

        let size = self.estimator.estimate(&record.path).await?;
        self.sizes.insert(id.clone(), size);
        Ok(size)
    }

    pub fn launch_game(&self, exec_path: &str) -> Result<u32, HostError> {
        Ok(self.processes.launch(exec_path)?)
    }

    pub fn goto(&mut self, page: &str, add_to_history: bool) -> NavigationOutcome {
        let load = self.history.goto(page, add_to_history);
        NavigationOutcome {
            history: self.history.snapshot(),
            load: Some(load),
        }
    }

    pub fn back(&mut self) -> NavigationOutcome {
        let load = self.history.back().map(str::to_string);
        NavigationOutcome {
            history: self.history.snapshot(),
            load,
        }
    }

    pub fn forward(&mut self) -> NavigationOutcome {
        let load = self.history.forward().map(str::to_string);
        NavigationOutcome {
            history: self.history.snapshot(),
            load,
        }
    }

    pub fn history(&self) -> HistorySnapshot {
        self.history.snapshot()
    }

    pub fn current_page(&self) -> Option<String> {
        self.history.current_page().map(str::to_string)
    }

    pub async fn select_executable(&self) -> Result<Option<PathBuf>, HostError> {
        self.picker.pick(PickKind::Executable).await
    }

    pub async fn select_image(&self) -> Result<Option<PathBuf>, HostError> {
        self.picker.pick(PickKind::Image).await
    }

    pub fn themes(&self) -> ThemeCatalog {
        ThemeCatalog::load_or_empty(&self.config.library.themes_path())
    }

    pub fn list_games(&self, sort: SortMode, tag: Option<&str>) -> Vec<ListedGame> {
        list_games(&self.load_games(), sort, tag)
    }

    pub fn search_titles(&self, query: &str) -> Vec<TitleMatch> {
        self.titles.search(query)
    }

    pub fn processes(&self) -> &ProcessRegistry {
        &self.processes
    }

    pub fn shutdown(self) {
        let running = self.processes.active_count();
        if running > 0 {
            tracing::info!("Shutting down with {} game(s) still running", running);
        } else {
            tracing::info!("Shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gameshelf_launch::mock::MockSpawner;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn host() -> (TempDir, Host) {
        let dir = TempDir::new().unwrap();
        let mut config = ShelfConfig::default();
        config.library.data_dir = dir.path().join("data");
        let host = Host::with_registry(config, ProcessRegistry::new(Arc::new(MockSpawner::new())));
        (dir, host)
    }

    fn game_file(dir: &TempDir, name: &str, size: usize) -> String {
        let path = dir.path().join("games").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, vec![0u8; size]).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_startup_history() {
        let (_dir, host) = host();
        assert_eq!(host.current_page().as_deref(), Some("./index.html"));
        assert_eq!(host.history().pages.len(), 1);
    }

    #[test]
    fn test_save_keeps_title_index_current() {
        let (_dir, mut host) = host();
        let id = host.save_game(GameRecord::new("Outer Wilds", "/ow")).unwrap();
        assert_eq!(host.search_titles("wild")[0].id, id);

        host.update_game(&id, GameRecord::new("Outer Wilds DLC", "/ow")).unwrap();
        assert_eq!(host.search_titles("dlc").len(), 1);

        host.remove_game(&id).unwrap();
        assert!(host.search_titles("wild").is_empty());
    }

    #[test]
    fn test_update_missing_game_leaves_store_untouched() {
        let (_dir, mut host) = host();
        host.save_game(GameRecord::new("A", "/a")).unwrap();

        let err = host
            .update_game(&GameId::from(99), GameRecord::new("B", "/b"))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert_eq!(host.load_games().len(), 1);
    }

    #[tokio::test]
    async fn test_install_size_cached_until_path_changes() {
        let (dir, mut host) = host();
        let first = game_file(&dir, "one/game", 100);
        let second = game_file(&dir, "two/game", 700);

        let id = host.save_game(GameRecord::new("G", first.clone())).unwrap();
        assert_eq!(host.game_install_size(&id).await.unwrap(), 100);

        // Growth on disk is not seen while cached
        game_file(&dir, "one/extra", 50);
        assert_eq!(host.game_install_size(&id).await.unwrap(), 100);

        // Same path: still cached
        host.update_game(&id, GameRecord::new("G2", first)).unwrap();
        assert_eq!(host.game_install_size(&id).await.unwrap(), 100);

        host.update_game(&id, GameRecord::new("G", second)).unwrap();
        assert_eq!(host.game_install_size(&id).await.unwrap(), 700);
    }

    #[tokio::test]
    async fn test_game_install_size_unknown_game() {
        let (_dir, mut host) = host();
        assert!(host.game_install_size(&GameId::from(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_launch_twice() {
        let (_dir, host) = host();
        host.launch_game("/games/x/x").unwrap();
        let err = host.launch_game("/games/x/x").unwrap_err();
        assert!(err.to_string().contains("already running"));
    }

    #[test]
    fn test_themes_missing_file() {
        let (_dir, host) = host();
        assert!(host.themes().themes.is_empty());
    }
}
