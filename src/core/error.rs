//! Error types for document and state persistence

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a persistence operation.
///
/// Best-effort reads (autosave, recent list) never produce these; they fall
/// back to an empty default instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading a user-chosen document failed
    #[error("Failed to read file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Writing a user-chosen document failed
    #[error("Failed to write file {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Writing the autosave buffer or the recent list failed
    #[error("Failed to persist {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_carries_cause() {
        let err = StoreError::FileRead {
            path: PathBuf::from("/tmp/missing.md"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/missing.md"));
        assert!(message.contains("no such file"));
        assert!(err.source().is_some());
    }
}
