//! Conflict detection and resolution for copy destinations.

use std::fs::Metadata;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CopyError, CopyResult};

/// What already occupies a destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// A file already exists at the destination.
    FileExists,
    /// A directory already exists at the destination.
    DirectoryExists,
    /// A symbolic link already exists at the destination.
    SymlinkExists,
}

impl ConflictKind {
    /// Classify an existing destination from its symlink metadata.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            Self::SymlinkExists
        } else if file_type.is_dir() {
            Self::DirectoryExists
        } else {
            Self::FileExists
        }
    }
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileExists => write!(f, "File already exists"),
            Self::DirectoryExists => write!(f, "Directory already exists"),
            Self::SymlinkExists => write!(f, "Symlink already exists"),
        }
    }
}

/// How conflicts are resolved for a whole copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConflictResolution {
    /// Fail the copy.
    #[default]
    Abort,
    /// Replace files and symlinks, merge into directories.
    Overwrite,
}

impl ConflictResolution {
    /// Map the `overwrite` option onto a resolution.
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite { Self::Overwrite } else { Self::Abort }
    }
}

/// Outcome of checking one destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// Nothing is in the way.
    Proceed,
    /// An existing directory is reused; its other children stay.
    Merge,
    /// An existing file or link is replaced.
    Replace,
}

/// Applies the overwrite policy to destination paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver {
    resolution: ConflictResolution,
}

impl ConflictResolver {
    /// Create a resolver for the given `overwrite` option.
    pub fn new(overwrite: bool) -> Self {
        Self {
            resolution: ConflictResolution::from_overwrite(overwrite),
        }
    }

    /// The active resolution.
    pub fn resolution(&self) -> ConflictResolution {
        self.resolution
    }

    /// Whether existing destination entries may be replaced.
    pub fn overwrites(&self) -> bool {
        self.resolution == ConflictResolution::Overwrite
    }

    /// Decide what to do about `destination`, given what currently exists there.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::AlreadyExists`] when something exists and
    /// overwriting is disabled.
    pub fn resolve(&self, destination: &Path, existing: Option<ConflictKind>) -> CopyResult<Resolved> {
        let Some(kind) = existing else {
            return Ok(Resolved::Proceed);
        };

        match self.resolution {
            ConflictResolution::Abort => Err(CopyError::AlreadyExists {
                path: destination.to_path_buf(),
            }),
            ConflictResolution::Overwrite => Ok(match kind {
                ConflictKind::DirectoryExists => Resolved::Merge,
                ConflictKind::FileExists | ConflictKind::SymlinkExists => Resolved::Replace,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_destination_proceeds() {
        let resolver = ConflictResolver::new(false);
        let resolved = resolver.resolve(Path::new("/tmp/b"), None).unwrap();
        assert_eq!(resolved, Resolved::Proceed);
    }

    #[test]
    fn test_existing_destination_without_overwrite_fails() {
        let resolver = ConflictResolver::new(false);
        let err = resolver
            .resolve(Path::new("/tmp/b"), Some(ConflictKind::DirectoryExists))
            .unwrap_err();
        assert_eq!(err.code(), "EEXIST");
        assert!(matches!(err, CopyError::AlreadyExists { .. }));
    }

    #[test]
    fn test_overwrite_merges_directories_and_replaces_files() {
        let resolver = ConflictResolver::new(true);
        assert_eq!(resolver.resolution(), ConflictResolution::Overwrite);

        assert!(resolver.overwrites());

        let resolve = |path: &str, kind| resolver.resolve(Path::new(path), Some(kind)).unwrap();
        assert_eq!(resolve("/tmp/b", ConflictKind::DirectoryExists), Resolved::Merge);
        assert_eq!(resolve("/tmp/b/f", ConflictKind::FileExists), Resolved::Replace);
        assert_eq!(resolve("/tmp/b/l", ConflictKind::SymlinkExists), Resolved::Replace);
    }

    #[test]
    fn test_conflict_kind_from_metadata() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("f");
        std::fs::write(&file, "x").unwrap();

        let dir_meta = std::fs::symlink_metadata(temp.path()).unwrap();
        let file_meta = std::fs::symlink_metadata(&file).unwrap();
        assert_eq!(ConflictKind::from_metadata(&dir_meta), ConflictKind::DirectoryExists);
        assert_eq!(ConflictKind::from_metadata(&file_meta), ConflictKind::FileExists);
    }
}
