//! Most-recently-used list of opened and saved documents

use std::collections::HashSet;
use std::io;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::error::StoreError;
use super::paths::StoragePaths;

/// Maximum number of entries kept in the recent list
pub const MAX_RECENT_FILES: usize = 10;

/// Move `path` to the front of `recents`, dropping any earlier occurrence
/// and anything past [`MAX_RECENT_FILES`].
///
/// Duplicates already in `recents` collapse to their first occurrence.
/// Entries are compared as plain strings, so two spellings of the same file
/// are kept as separate entries.
pub fn push_recent(recents: &mut Vec<String>, path: &str) {
    let mut seen = HashSet::new();
    recents.retain(|p| p != path && seen.insert(p.clone()));
    recents.insert(0, path.to_string());
    recents.truncate(MAX_RECENT_FILES);
}

/// Recent-file list persisted as a JSON array of paths, newest first
#[derive(Debug, Clone)]
pub struct RecentFiles {
    paths: StoragePaths,
    /// Serialises read-modify-write cycles on the backing file
    update_lock: Arc<Mutex<()>>,
}

impl RecentFiles {
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            update_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load the recent list, or an empty list if it is missing or corrupt
    pub async fn get_recent(&self) -> Vec<String> {
        let path = self.paths.recent_path();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No recent list at {}", path.display());
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable recent list {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed recent list {}: {}", path.display(), e);
            Vec::new()
        })
    }

    /// Record `path` as the most recently used document
    pub async fn add_recent(&self, path: &str) -> Result<(), StoreError> {
        let _guard = self.update_lock.lock().await;

        let mut recents = self.get_recent().await;
        push_recent(&mut recents, path);
        self.write(&recents).await
    }

    async fn write(&self, recents: &[String]) -> Result<(), StoreError> {
        let path = self.paths.recent_path();
        let persistence = |source: io::Error| StoreError::Persistence {
            path: path.clone(),
            source,
        };

        let content = serde_json::to_string(recents).map_err(|e| persistence(e.into()))?;
        tokio::fs::write(&path, content).await.map_err(persistence)?;

        tracing::debug!("Saved {} recent files to {}", recents.len(), path.display());
        Ok(())
    }
}
