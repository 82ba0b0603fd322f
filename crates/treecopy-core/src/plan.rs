//! Per-entry copy planning.
//!
//! The planner is pure: it turns an already-walked [`WalkEntry`] into a
//! [`CopyAction`] without touching the filesystem, so the blocking and async
//! engines share every filtering and path decision.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::entry::{EntryKind, WalkEntry};
use crate::matcher::PathMatcher;

/// Why an entry was not copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Rejected by the `matching` patterns.
    Filtered,
    /// Entry type that cannot be reproduced here (sockets, devices, links
    /// on platforms without symlink support).
    Unsupported,
}

/// What to do with one walked entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyAction {
    /// Leave the entry out. Directories are still descended into.
    Skip {
        source: PathBuf,
        reason: SkipReason,
    },
    /// Ensure a directory exists at `destination`.
    CreateDir {
        destination: PathBuf,
        mode: Option<u32>,
    },
    /// Copy file content from `source` to `destination`.
    CopyFile {
        source: PathBuf,
        destination: PathBuf,
        mode: Option<u32>,
    },
    /// Recreate the link at `source` under `destination`.
    CreateSymlink {
        source: PathBuf,
        destination: PathBuf,
    },
}

impl CopyAction {
    /// Destination path touched by this action, if any.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Self::Skip { .. } => None,
            Self::CreateDir { destination, .. }
            | Self::CopyFile { destination, .. }
            | Self::CreateSymlink { destination, .. } => Some(destination),
        }
    }

    /// Whether the entry is left out.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }
}

/// Maps walked entries onto destination actions.
#[derive(Debug, Clone)]
pub struct CopyPlanner {
    source_root: PathBuf,
    destination_root: PathBuf,
    matcher: PathMatcher,
}

impl CopyPlanner {
    /// Create a planner for one copy.
    pub fn new(source_root: PathBuf, destination_root: PathBuf, matcher: PathMatcher) -> Self {
        Self {
            source_root,
            destination_root,
            matcher,
        }
    }

    /// Destination path for an entry's relative path.
    pub fn destination_for(&self, relative_path: &Path) -> PathBuf {
        if relative_path.as_os_str().is_empty() {
            self.destination_root.clone()
        } else {
            self.destination_root.join(relative_path)
        }
    }

    /// Whether the entry passes the matching patterns.
    ///
    /// A directory root is always kept, a file root is matched by its name.
    pub fn is_selected(&self, entry: &WalkEntry) -> bool {
        if entry.is_root() {
            if entry.kind.is_dir() {
                return true;
            }
            let name = self
                .source_root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return self.matcher.matches(&name);
        }
        self.matcher.matches(&entry.match_path())
    }

    /// Plan the action for one entry.
    pub fn plan(&self, entry: &WalkEntry) -> CopyAction {
        let action = if !self.is_selected(entry) {
            CopyAction::Skip {
                source: entry.source_path.clone(),
                reason: SkipReason::Filtered,
            }
        } else {
            let destination = self.destination_for(&entry.relative_path);
            match entry.kind {
                EntryKind::Directory => CopyAction::CreateDir {
                    destination,
                    mode: entry.mode,
                },
                EntryKind::File => CopyAction::CopyFile {
                    source: entry.source_path.clone(),
                    destination,
                    mode: entry.mode,
                },
                EntryKind::Symlink if cfg!(unix) => CopyAction::CreateSymlink {
                    source: entry.source_path.clone(),
                    destination,
                },
                EntryKind::Symlink | EntryKind::Other => CopyAction::Skip {
                    source: entry.source_path.clone(),
                    reason: SkipReason::Unsupported,
                },
            }
        };

        debug!(path = %entry.source_path.display(), kind = %entry.kind, action = ?action, "planned entry");
        action
    }
}

/// Directory modes collected during a copy and applied once it finishes.
///
/// Applying them last keeps a read-only source directory from blocking the
/// copy of its own children.
#[derive(Debug, Clone, Default)]
pub struct DeferredModes {
    entries: Vec<(PathBuf, u32)>,
}

impl DeferredModes {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directory mode, if there is one.
    pub fn push(&mut self, path: PathBuf, mode: Option<u32>) {
        if let Some(mode) = mode {
            self.entries.push((path, mode));
        }
    }

    /// Consume the set, deepest directories first.
    pub fn into_deepest_first(self) -> impl Iterator<Item = (PathBuf, u32)> {
        // Parents are recorded before their children.
        self.entries.into_iter().rev()
    }
}
