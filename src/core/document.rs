//! Reading and writing user-chosen markdown documents

use std::path::{Path, PathBuf};

use super::error::StoreError;
use super::recent::RecentFiles;

/// The buffer being edited and the file it belongs to, if any
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// File path, `None` until the buffer is first saved or opened
    pub path: Option<PathBuf>,
    /// Document content
    pub content: String,
    /// Whether the document has unsaved changes
    pub modified: bool,
}

impl Document {
    /// Get the document title (filename without extension)
    pub fn title(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// Update content and mark as modified
    pub fn set_content(&mut self, content: String) {
        if self.content != content {
            self.content = content;
            self.modified = true;
        }
    }
}

/// Result of a successful open
#[derive(Debug)]
pub struct Opened {
    pub path: PathBuf,
    pub content: String,
    /// Set when the document was read but the recent list could not be updated
    pub recent_error: Option<StoreError>,
}

/// Result of a successful save
#[derive(Debug)]
pub struct Saved {
    pub path: PathBuf,
    /// Set when the document was written but the recent list could not be updated
    pub recent_error: Option<StoreError>,
}

/// Document I/O that records every successful access in the recent list
#[derive(Debug, Clone)]
pub struct DocumentIo {
    recent: RecentFiles,
}

impl DocumentIo {
    pub fn new(recent: RecentFiles) -> Self {
        Self { recent }
    }

    /// Read `path` as UTF-8 and move it to the front of the recent list
    pub async fn read_file_content(&self, path: &Path) -> Result<Opened, StoreError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!("Opened document: {}", path.display());

        Ok(Opened {
            path: path.to_path_buf(),
            content,
            recent_error: self.record(path).await,
        })
    }

    /// Overwrite `path` with `content` and move it to the front of the recent list
    pub async fn save_file_content(&self, path: &Path, content: &str) -> Result<Saved, StoreError> {
        tokio::fs::write(path, content)
            .await
            .map_err(|source| StoreError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!("Saved document: {}", path.display());

        Ok(Saved {
            path: path.to_path_buf(),
            recent_error: self.record(path).await,
        })
    }

    /// Save to `existing_path`, or to a path obtained from `choose` when the
    /// document has never been saved.
    ///
    /// `choose` is only called without an existing path; returning `None`
    /// (a cancelled dialog) leaves everything untouched and yields `Ok(None)`.
    pub async fn save_document<F>(
        &self,
        content: &str,
        existing_path: Option<&Path>,
        choose: F,
    ) -> Result<Option<Saved>, StoreError>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let path = match existing_path {
            Some(path) => path.to_path_buf(),
            None => match choose() {
                Some(path) => path,
                None => {
                    tracing::debug!("Save cancelled");
                    return Ok(None);
                }
            },
        };

        self.save_file_content(&path, content).await.map(Some)
    }

    async fn record(&self, path: &Path) -> Option<StoreError> {
        let entry = path.to_string_lossy();
        match self.recent.add_recent(&entry).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Recent list not updated for {}: {}", path.display(), e);
                Some(e)
            }
        }
    }
}
