//! Locations of the per-user state files

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};

/// File holding the unsaved editor buffer
pub const AUTOSAVE_FILE: &str = "autosave.md";
/// File holding the recent-file list
pub const RECENT_FILE: &str = "recent.json";

/// Resolves the state file paths from the application data directory.
///
/// Clones share the same directory, so [`StoragePaths::set_data_dir`] is seen
/// by every store holding a clone. Paths are joined on every call and never
/// cached.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    data_dir: Arc<RwLock<PathBuf>>,
}

impl StoragePaths {
    /// Create a resolver rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Arc::new(RwLock::new(data_dir.into())),
        }
    }

    /// Current application data directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Point every holder of this resolver at a different directory
    pub fn set_data_dir(&self, data_dir: impl Into<PathBuf>) {
        let data_dir = data_dir.into();
        tracing::debug!("Data directory set to: {}", data_dir.display());
        *self
            .data_dir
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = data_dir;
    }

    /// Path of the autosave file in the current data directory
    pub fn autosave_path(&self) -> PathBuf {
        self.data_dir().join(AUTOSAVE_FILE)
    }

    /// Path of the recent-list file in the current data directory
    pub fn recent_path(&self) -> PathBuf {
        self.data_dir().join(RECENT_FILE)
    }

    /// First-run initialisation: create the data directory if needed
    pub async fn ensure_data_dir(&self) -> Result<PathBuf> {
        let dir = self.data_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_join_file_names() {
        let paths = StoragePaths::new("/data/mdpad");
        assert_eq!(paths.autosave_path(), PathBuf::from("/data/mdpad/autosave.md"));
        assert_eq!(paths.recent_path(), PathBuf::from("/data/mdpad/recent.json"));
    }

    #[test]
    fn test_override_is_seen_by_clones() {
        let paths = StoragePaths::new("/first");
        let shared = paths.clone();

        paths.set_data_dir("/second");

        assert_eq!(shared.autosave_path(), PathBuf::from("/second/autosave.md"));
        assert_eq!(shared.recent_path(), PathBuf::from("/second/recent.json"));
    }

    #[tokio::test]
    async fn test_ensure_data_dir_creates_missing_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = StoragePaths::new(temp.path().join("nested").join("data"));

        let dir = paths.ensure_data_dir().await.unwrap();

        assert!(dir.is_dir());
    }
}
