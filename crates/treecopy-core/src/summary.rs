//! Result summary of a finished copy.

use serde::{Deserialize, Serialize};

/// Counts gathered while executing a copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopySummary {
    /// Regular files written.
    pub files_copied: usize,
    /// Directories created or merged into.
    pub directories_created: usize,
    /// Symbolic links recreated.
    pub symlinks_created: usize,
    /// Entries left out by filtering or because their type is unsupported.
    pub entries_skipped: usize,
    /// Total bytes of file content written.
    pub bytes_copied: u64,
}

impl CopySummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copied file.
    pub fn record_file(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_copied += bytes;
    }

    /// Record a created directory.
    pub fn record_dir(&mut self) {
        self.directories_created += 1;
    }

    /// Record a recreated symlink.
    pub fn record_symlink(&mut self) {
        self.symlinks_created += 1;
    }

    /// Record a skipped entry.
    pub fn record_skip(&mut self) {
        self.entries_skipped += 1;
    }

    /// Number of entries materialized at the destination.
    pub fn total(&self) -> usize {
        self.files_copied + self.directories_created + self.symlinks_created
    }

    /// Whether nothing was written.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get a human-readable summary of the copy.
    pub fn summary(&self) -> String {
        if self.entries_skipped == 0 {
            format!("Copied {} items", self.total())
        } else {
            format!(
                "Copied {} items, {} skipped",
                self.total(),
                self.entries_skipped
            )
        }
    }
}
