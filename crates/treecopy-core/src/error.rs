//! Error types for copy operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during a copy.
///
/// Every variant is fatal: the copy stops at the first error and whatever was
/// already written stays on disk.
#[derive(Debug, Error)]
pub enum CopyError {
    /// The source path does not exist.
    #[error("Path to copy doesn't exist {}", path.display())]
    NotFound { path: PathBuf },

    /// The destination exists and overwriting was not requested.
    #[error("Destination path already exists {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// A `matching` pattern is not valid glob syntax.
    #[error("Invalid matching pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The destination lies inside the source directory.
    #[error("Cannot copy a directory into itself: {} -> {}", source_dir.display(), destination.display())]
    DestinationInsideSource {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    /// Generic I/O error.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Errno-style code for this error.
    ///
    /// `ENOENT` and `EEXIST` are reserved for the source and destination
    /// checks; I/O failures map their [`io::ErrorKind`] onto the closest code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "ENOENT",
            Self::AlreadyExists { .. } => "EEXIST",
            Self::InvalidPattern { .. } | Self::DestinationInsideSource { .. } => "EINVAL",
            Self::Io { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => "ENOENT",
                io::ErrorKind::AlreadyExists => "EEXIST",
                io::ErrorKind::PermissionDenied => "EACCES",
                io::ErrorKind::InvalidInput => "EINVAL",
                io::ErrorKind::NotADirectory => "ENOTDIR",
                io::ErrorKind::IsADirectory => "EISDIR",
                io::ErrorKind::StorageFull => "ENOSPC",
                io::ErrorKind::ReadOnlyFilesystem => "EROFS",
                _ => "EIO",
            },
        }
    }

    /// The path the error refers to, when there is one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NotFound { path } | Self::AlreadyExists { path } | Self::Io { path, .. } => {
                Some(path)
            }
            Self::DestinationInsideSource { destination, .. } => Some(destination),
            Self::InvalidPattern { .. } => None,
        }
    }
}

/// Result alias used throughout treecopy.
pub type CopyResult<T> = Result<T, CopyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_and_code() {
        let err = CopyError::NotFound {
            path: PathBuf::from("/tmp/a"),
        };
        assert_eq!(err.code(), "ENOENT");
        assert!(err.to_string().starts_with("Path to copy doesn't exist"));
    }

    #[test]
    fn test_already_exists_message_and_code() {
        let err = CopyError::AlreadyExists {
            path: PathBuf::from("/tmp/b"),
        };
        assert_eq!(err.code(), "EEXIST");
        assert!(err.to_string().starts_with("Destination path already exists"));
    }

    #[test]
    fn test_io_error_code_follows_kind() {
        let err = CopyError::io(
            "/test/path",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.code(), "EACCES");
        assert_eq!(err.path(), Some(&PathBuf::from("/test/path")));

        let err = CopyError::io("/test/path", io::Error::other("boom"));
        assert_eq!(err.code(), "EIO");
    }
}
