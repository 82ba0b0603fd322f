//! Core types for treecopy.
//!
//! This crate holds everything about a copy that does not depend on how I/O
//! is scheduled: options, errors, the walked entry model, the glob matcher,
//! the per-entry planner and the overwrite policy. The blocking and async
//! engines in `treecopy-ops` both drive these same types.

mod config;
mod conflict;
mod entry;
mod error;
mod matcher;
mod plan;
mod request;
mod summary;

pub use config::{CopyOptions, CopyOptionsBuilder, CopyOptionsBuilderError};
pub use conflict::{ConflictKind, ConflictResolution, ConflictResolver, Resolved};
pub use entry::{EntryKind, WalkEntry, mode_bits, to_match_path};
pub use error::{CopyError, CopyResult};
pub use matcher::PathMatcher;
pub use plan::{CopyAction, CopyPlanner, DeferredModes, SkipReason};
pub use request::CopyRequest;
pub use summary::CopySummary;
