//! Walked entry types.

use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Type of a walked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (never followed).
    Symlink,
    /// Other file types (sockets, devices, etc.).
    Other,
}

impl EntryKind {
    /// Classify from symlink metadata.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
            Self::Symlink => write!(f, "symlink"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A single entry produced by a tree walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path relative to the copy root (empty for the root itself).
    pub relative_path: PathBuf,

    /// Absolute path of the entry in the source tree.
    pub source_path: PathBuf,

    /// Entry type.
    pub kind: EntryKind,

    /// Permission bits (`mode & 0o7777`), POSIX only.
    pub mode: Option<u32>,

    /// Depth below the copy root (0 for the root).
    pub depth: usize,
}

impl WalkEntry {
    /// Build an entry from symlink metadata fetched by a walker.
    pub fn from_metadata(root: &Path, source_path: PathBuf, depth: usize, metadata: &Metadata) -> Self {
        let relative_path = source_path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            relative_path,
            source_path,
            kind: EntryKind::from_metadata(metadata),
            mode: mode_bits(metadata),
            depth,
        }
    }

    /// Whether this entry is the copy root.
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// The relative path as a `/`-separated string, used for matching.
    pub fn match_path(&self) -> String {
        to_match_path(&self.relative_path)
    }
}

/// Join the normal components of `path` with `/`.
pub fn to_match_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if let Component::Normal(segment) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&segment.to_string_lossy());
        }
    }
    out
}

/// Permission bits of `metadata`, or `None` where the platform has none.
pub fn mode_bits(metadata: &Metadata) -> Option<u32> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(metadata.permissions().mode() & 0o7777)
    }
    #[cfg(not(unix))]
    {
        let _ = metadata;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_path_uses_forward_slashes() {
        let path: PathBuf = ["a", "b", "file.txt"].iter().collect();
        assert_eq!(to_match_path(&path), "a/b/file.txt");
        assert_eq!(to_match_path(Path::new("")), "");
        assert_eq!(to_match_path(Path::new("./a/b")), "a/b");
    }

    #[test]
    fn test_entry_from_metadata() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("sub").join("f.txt");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "abc").unwrap();

        let metadata = std::fs::symlink_metadata(&file).unwrap();
        let entry = WalkEntry::from_metadata(temp.path(), file.clone(), 2, &metadata);

        assert_eq!(entry.kind, EntryKind::File);
        assert_eq!(entry.match_path(), "sub/f.txt");
        assert!(!entry.is_root());
        #[cfg(unix)]
        assert!(entry.mode.is_some());
    }

    #[test]
    fn test_root_entry_has_empty_relative_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let metadata = std::fs::symlink_metadata(temp.path()).unwrap();
        let entry = WalkEntry::from_metadata(temp.path(), temp.path().to_path_buf(), 0, &metadata);

        assert!(entry.is_root());
        assert!(entry.kind.is_dir());
        assert_eq!(entry.match_path(), "");
    }
}
