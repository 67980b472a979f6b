//! Store error types.

use mapnote_storage::{CodecError, ErrorKind, StorageError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while opening or saving a store.
///
/// History operations never fail; only the file system and the database
/// contents can.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The directory or database file could not be read, written or synced.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The database file exists but does not hold a valid document.
    #[error("invalid database: {0}")]
    Codec(#[source] CodecError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::Codec(err) => ErrorKind::of_codec(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io { path, source } => Self::Io { path, source },
            StorageError::Codec(err) => Self::Codec(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapnote_storage::IdentityError;

    #[test]
    fn storage_io_keeps_path() {
        let err = StoreError::from(StorageError::Io {
            path: PathBuf::from("/srv/map/database.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().starts_with("IO error at /srv/map/database.json"));
    }

    #[test]
    fn codec_kind_is_preserved() {
        let err = StoreError::from(StorageError::Codec(CodecError::from(
            IdentityError::Dangling {
                number: 3,
                at: "pois[1].floor".into(),
            },
        )));
        assert_eq!(err.kind(), ErrorKind::Identity);
        assert_eq!(
            err.to_string(),
            "invalid database: reference 3 at pois[1].floor has no prior definition"
        );
    }
}
