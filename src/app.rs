//! Editor session state and coordination of the persistence stores

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::autosave::{AutosaveDebouncer, AutosaveStore};
use crate::core::document::{Document, DocumentIo};
use crate::core::error::StoreError;
use crate::core::paths::StoragePaths;
use crate::core::recent::RecentFiles;

/// State a front end holds while editing one buffer
pub struct EditorSession {
    /// The buffer being edited
    pub document: Document,
    /// Recent files as last read from storage, newest first
    pub recent_files: Vec<String>,
    /// Recent-list failure from the last open or save that otherwise succeeded
    #[allow(dead_code)]
    pub recent_warning: Option<StoreError>,
    autosave: AutosaveStore,
    recent: RecentFiles,
    io: DocumentIo,
    debouncer: AutosaveDebouncer,
}

impl EditorSession {
    /// Create a session on the current tokio runtime
    pub fn new(paths: StoragePaths, autosave_delay: Duration) -> Self {
        let autosave = AutosaveStore::new(paths.clone());
        let recent = RecentFiles::new(paths);
        Self {
            document: Document::default(),
            recent_files: Vec::new(),
            recent_warning: None,
            debouncer: AutosaveDebouncer::spawn(autosave.clone(), autosave_delay),
            io: DocumentIo::new(recent.clone()),
            autosave,
            recent,
        }
    }

    /// Restore the autosaved buffer and the recent list
    pub async fn start(&mut self) {
        self.document.content = self.autosave.read_autosave().await;
        self.recent_files = self.recent.get_recent().await;
        tracing::info!(
            "Session started: {} bytes restored, {} recent files",
            self.document.content.len(),
            self.recent_files.len()
        );
    }

    /// Replace the buffer and schedule an autosave
    pub fn edit(&mut self, content: impl Into<String>) {
        self.document.set_content(content.into());
        self.debouncer.schedule(self.document.content.clone());
    }

    /// Open `path` into the buffer.
    ///
    /// On failure the current buffer and path are left as they were.
    pub async fn open(&mut self, path: &Path) -> Result<(), StoreError> {
        let opened = self.io.read_file_content(path).await?;

        self.document = Document {
            path: Some(opened.path),
            content: opened.content,
            modified: false,
        };
        tracing::debug!("Editing \"{}\"", self.document.title());
        self.debouncer.schedule(self.document.content.clone());
        self.recent_warning = opened.recent_error;
        self.refresh_recent().await;
        Ok(())
    }

    /// Open an entry from the recent list
    pub async fn open_recent(&mut self, entry: &str) -> Result<(), StoreError> {
        self.open(Path::new(entry)).await
    }

    /// Save to the current path, asking `choose` only if there is none.
    ///
    /// Returns `false` when the chooser was cancelled.
    pub async fn save<F>(&mut self, choose: F) -> Result<bool, StoreError>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let existing = self.document.path.clone();
        self.save_to(existing.as_deref(), choose).await
    }

    /// Save to a path obtained from `choose`
    pub async fn save_as<F>(&mut self, choose: F) -> Result<bool, StoreError>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        self.save_to(None, choose).await
    }

    async fn save_to<F>(&mut self, existing: Option<&Path>, choose: F) -> Result<bool, StoreError>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let Some(saved) = self
            .io
            .save_document(&self.document.content, existing, choose)
            .await?
        else {
            return Ok(false);
        };

        self.document.path = Some(saved.path);
        self.document.modified = false;
        self.recent_warning = saved.recent_error;
        self.refresh_recent().await;
        Ok(true)
    }

    /// Start an empty, untitled buffer
    pub fn new_file(&mut self) {
        self.document = Document::default();
        self.debouncer.schedule(String::new());
    }

    async fn refresh_recent(&mut self) {
        self.recent_files = self.recent.get_recent().await;
    }

    /// Write any pending autosave and stop the autosave task
    pub async fn shutdown(self) {
        self.debouncer.shutdown().await;
        tracing::info!("Session closed");
    }
}
