//! Autosave of the unsaved editor buffer

use std::io;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::error::StoreError;
use super::paths::StoragePaths;

/// Default quiet period between the last edit and the autosave write
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

/// Reads and writes the autosave file
#[derive(Debug, Clone)]
pub struct AutosaveStore {
    paths: StoragePaths,
}

impl AutosaveStore {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    /// Load the autosaved buffer, or an empty string if there is none.
    ///
    /// A missing or unreadable file is not an error here; the failure is
    /// logged and the empty buffer returned.
    pub async fn read_autosave(&self) -> String {
        let path = self.paths.autosave_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No autosave at {}", path.display());
                String::new()
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable autosave {}: {}", path.display(), e);
                String::new()
            }
        }
    }

    /// Overwrite the autosave file with `content`
    pub async fn save_autosave(&self, content: &str) -> Result<(), StoreError> {
        let path = self.paths.autosave_path();
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| StoreError::Persistence {
                path: path.clone(),
                source,
            })?;
        tracing::debug!("Autosaved {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

enum Command {
    Schedule(String),
    Flush(oneshot::Sender<()>),
}

/// Debounces autosave writes behind a quiet period.
///
/// Every [`schedule`](Self::schedule) replaces the pending buffer and
/// restarts the timer; only the latest buffer is written once no edit has
/// arrived for the configured delay.
pub struct AutosaveDebouncer {
    tx: mpsc::UnboundedSender<Command>,
    handle: JoinHandle<()>,
}

impl AutosaveDebouncer {
    /// Spawn the debounce task on the current tokio runtime
    pub fn spawn(store: AutosaveStore, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(Self::run(store, delay, rx));
        Self { tx, handle }
    }

    async fn run(store: AutosaveStore, delay: Duration, mut rx: mpsc::UnboundedReceiver<Command>) {
        let mut pending: Option<String> = None;

        loop {
            let command = if pending.is_some() {
                tokio::select! {
                    command = rx.recv() => command,
                    _ = tokio::time::sleep(delay) => {
                        Self::write(&store, pending.take()).await;
                        continue;
                    }
                }
            } else {
                rx.recv().await
            };

            match command {
                Some(Command::Schedule(content)) => pending = Some(content),
                Some(Command::Flush(done)) => {
                    Self::write(&store, pending.take()).await;
                    let _ = done.send(());
                }
                None => {
                    Self::write(&store, pending.take()).await;
                    break;
                }
            }
        }
    }

    async fn write(store: &AutosaveStore, content: Option<String>) {
        let Some(content) = content else {
            return;
        };
        // Not retried; the next edit schedules a fresh write.
        if let Err(e) = store.save_autosave(&content).await {
            tracing::error!("Autosave failed: {}", e);
        }
    }

    /// Replace the pending buffer and restart the quiet period
    pub fn schedule(&self, content: impl Into<String>) {
        if self.tx.send(Command::Schedule(content.into())).is_err() {
            tracing::warn!("Autosave task has stopped; edit not scheduled");
        }
    }

    /// Write the pending buffer now, if any
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Flush the pending buffer and stop the task
    pub async fn shutdown(self) {
        self.flush().await;
        drop(self.tx);
        if let Err(e) = self.handle.await {
            tracing::error!("Autosave task panicked: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (AutosaveStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = AutosaveStore::new(StoragePaths::new(temp_dir.path()));
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_read_without_autosave_is_empty() {
        let (store, _temp_dir) = create_test_store();
        assert_eq!(store.read_autosave().await, "");
    }

    #[tokio::test]
    async fn test_save_then_read_round_trips() {
        let (store, _temp_dir) = create_test_store();

        for content in ["# Title\n\nbody", "", "ünïcødé ✓\r\nline two"] {
            store.save_autosave(content).await.unwrap();
            assert_eq!(store.read_autosave().await, content);
        }
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_content() {
        let (store, _temp_dir) = create_test_store();

        store.save_autosave("a much longer first draft").await.unwrap();
        store.save_autosave("short").await.unwrap();

        assert_eq!(store.read_autosave().await, "short");
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let (_store, temp_dir) = create_test_store();
        let store = AutosaveStore::new(StoragePaths::new(temp_dir.path().join("missing")));

        let result = store.save_autosave("text").await;

        match result {
            Err(StoreError::Persistence { path, .. }) => {
                assert!(path.ends_with("autosave.md"));
            }
            other => panic!("Expected Persistence error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_invalid_utf8_is_empty() {
        let (store, temp_dir) = create_test_store();
        std::fs::write(temp_dir.path().join("autosave.md"), [0xff, 0xfe, 0xfd]).unwrap();

        assert_eq!(store.read_autosave().await, "");
    }

    /// Read until the debounce task's write lands; the write itself runs on
    /// the blocking pool, outside the paused clock.
    async fn wait_for_autosave(store: &AutosaveStore, expected: &str) -> String {
        let mut content = store.read_autosave().await;
        for _ in 0..100 {
            if content == expected {
                break;
            }
            tokio::task::yield_now().await;
            content = store.read_autosave().await;
        }
        content
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_restarts_quiet_period_on_each_edit() {
        let (store, _temp_dir) = create_test_store();
        let debouncer = AutosaveDebouncer::spawn(store.clone(), Duration::from_millis(500));

        debouncer.schedule("a");
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(400)).await;

        debouncer.schedule("b");
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(400)).await;
        tokio::task::yield_now().await;

        // 800ms since the first edit, only 400ms since the last one
        assert_eq!(store.read_autosave().await, "");

        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(wait_for_autosave(&store, "b").await, "b");
        debouncer.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_flush_writes_before_quiet_period() {
        let (store, _temp_dir) = create_test_store();
        let debouncer = AutosaveDebouncer::spawn(store.clone(), Duration::from_millis(500));

        debouncer.schedule("pending");
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(400)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.read_autosave().await, "");

        debouncer.flush().await;
        assert_eq!(store.read_autosave().await, "pending");
        debouncer.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_flushes_pending_buffer() {
        let (store, _temp_dir) = create_test_store();
        let debouncer = AutosaveDebouncer::spawn(store.clone(), Duration::from_secs(60));

        debouncer.schedule("unsaved work");
        debouncer.shutdown().await;

        assert_eq!(store.read_autosave().await, "unsaved work");
    }
}
