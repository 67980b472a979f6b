//! Storage error types.

use crate::codec::CodecError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while reading or writing the database file.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file system refused a read, write, rename or sync.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its contents are not a valid document.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Coarse category, for callers that report rather than recover.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::Codec(err) => ErrorKind::of_codec(err),
        }
    }
}

/// Category of a storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The file system failed.
    Io,
    /// The text is not a well-formed document.
    Parse,
    /// Reference numbers do not resolve to exactly one entity.
    Identity,
    /// The document breaks a snapshot invariant.
    Consistency,
}

impl ErrorKind {
    pub fn of_codec(err: &CodecError) -> Self {
        match err {
            CodecError::Syntax(_) | CodecError::Parse { .. } => Self::Parse,
            CodecError::Identity(_) => Self::Identity,
            CodecError::Consistency(_) => Self::Consistency,
            // Nothing reaches the disk when encoding fails.
            CodecError::Encode(_) => Self::Io,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Io => "io",
            Self::Parse => "parse",
            Self::Identity => "identity",
            Self::Consistency => "consistency",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::IdentityError;
    use mapnote_model::ConsistencyError;

    #[test]
    fn io_error_names_path() {
        let err = StorageError::io(
            "/tmp/store/database.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/tmp/store/database.json"));
    }

    #[test]
    fn codec_errors_map_to_kinds() {
        let syntax = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            StorageError::from(CodecError::Syntax(syntax)).kind(),
            ErrorKind::Parse
        );

        let identity = CodecError::from(IdentityError::Zero { at: "pois[0].floor".into() });
        assert_eq!(StorageError::from(identity).kind(), ErrorKind::Identity);

        let consistency = CodecError::from(ConsistencyError::EmptyBuilding {
            building: "Shed".into(),
        });
        assert_eq!(StorageError::from(consistency).kind(), ErrorKind::Consistency);
    }

    #[test]
    fn kind_displays_lowercase() {
        assert_eq!(ErrorKind::Consistency.to_string(), "consistency");
    }
}
