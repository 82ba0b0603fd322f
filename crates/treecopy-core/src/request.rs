//! A validated copy invocation.

use std::path::{Path, PathBuf};

use crate::config::CopyOptions;
use crate::conflict::{ConflictKind, ConflictResolver, Resolved};
use crate::error::{CopyError, CopyResult};
use crate::matcher::PathMatcher;
use crate::plan::CopyPlanner;

/// Source, destination and options of one copy.
///
/// Paths are expected to be absolute; resolving relative paths is the
/// caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    source: PathBuf,
    destination: PathBuf,
    options: CopyOptions,
}

impl CopyRequest {
    /// Create a request.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>, options: CopyOptions) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            options,
        }
    }

    /// Source path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination path.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Copy options.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Compile the matching patterns into a planner.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::InvalidPattern`] for malformed globs.
    pub fn planner(&self) -> CopyResult<CopyPlanner> {
        let matcher = PathMatcher::new(&self.options.matching)?;
        Ok(CopyPlanner::new(
            self.source.clone(),
            self.destination.clone(),
            matcher,
        ))
    }

    /// Conflict resolver for this request's overwrite policy.
    pub fn resolver(&self) -> ConflictResolver {
        ConflictResolver::new(self.options.overwrite)
    }

    /// Fail with [`CopyError::NotFound`] unless the source exists.
    pub fn check_source(&self, exists: bool) -> CopyResult<()> {
        if exists {
            Ok(())
        } else {
            Err(CopyError::NotFound {
                path: self.source.clone(),
            })
        }
    }

    /// Reject copying a path onto itself or a directory into its own subtree.
    ///
    /// Comparison is lexical, so both paths should already be normalized.
    pub fn check_nesting(&self, source_is_dir: bool) -> CopyResult<()> {
        let nested = self.destination == self.source
            || (source_is_dir && self.destination.starts_with(&self.source));
        if nested {
            Err(CopyError::DestinationInsideSource {
                source_dir: self.source.clone(),
                destination: self.destination.clone(),
            })
        } else {
            Ok(())
        }
    }

    /// Apply the overwrite policy to whatever occupies the destination root.
    pub fn check_destination(&self, existing: Option<ConflictKind>) -> CopyResult<Resolved> {
        self.resolver().resolve(&self.destination, existing)
    }
}
