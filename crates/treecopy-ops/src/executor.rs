//! Materializes planned copy actions.
//!
//! [`BlockingExecutor`] and [`AsyncExecutor`] perform the same steps in the
//! same order; they differ only in whether each filesystem call blocks or is
//! awaited.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, trace, warn};

use treecopy_core::{
    ConflictKind, ConflictResolver, CopyAction, CopyError, CopyResult, CopySummary, DeferredModes,
    Resolved, SkipReason,
};

/// Bookkeeping shared by both executors.
#[derive(Debug, Default)]
struct ExecutionState {
    resolver: ConflictResolver,
    modes: DeferredModes,
    summary: CopySummary,
}

impl ExecutionState {
    fn new(resolver: ConflictResolver) -> Self {
        Self {
            resolver,
            ..Default::default()
        }
    }

    fn skip(&mut self, source: &Path, reason: SkipReason) {
        if reason == SkipReason::Unsupported {
            warn!(path = %source.display(), "skipping entry of unsupported type");
        }
        self.summary.record_skip();
    }

    /// Decide whether the entry at `destination` must be removed before
    /// writing. Links are always removed so nothing is written through them;
    /// files are removed only when a link takes their place.
    fn needs_removal(
        &self,
        destination: &Path,
        existing: Option<ConflictKind>,
        linking: bool,
    ) -> CopyResult<bool> {
        match self.resolver.resolve(destination, existing)? {
            Resolved::Proceed => Ok(false),
            Resolved::Replace => Ok(linking || existing == Some(ConflictKind::SymlinkExists)),
            // A directory cannot be replaced without deleting it.
            Resolved::Merge => Err(CopyError::AlreadyExists {
                path: destination.to_path_buf(),
            }),
        }
    }

    fn finish(self) -> (DeferredModes, CopySummary) {
        (self.modes, self.summary)
    }
}

fn existing_kind(result: std::io::Result<fs::Metadata>) -> Option<ConflictKind> {
    result.ok().map(|m| ConflictKind::from_metadata(&m))
}

#[cfg(unix)]
fn permissions(mode: u32) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    fs::Permissions::from_mode(mode)
}

/// Executes actions with blocking `std::fs` calls.
#[derive(Debug)]
pub struct BlockingExecutor {
    state: ExecutionState,
}

impl BlockingExecutor {
    /// Create an executor applying `resolver` to existing file and link destinations.
    pub fn new(resolver: ConflictResolver) -> Self {
        Self {
            state: ExecutionState::new(resolver),
        }
    }

    /// Perform one action.
    pub fn execute(&mut self, action: &CopyAction) -> CopyResult<()> {
        match action {
            CopyAction::Skip { source, reason } => self.state.skip(source, *reason),
            CopyAction::CreateDir { destination, mode } => {
                ensure_dir(destination)?;
                self.state.modes.push(destination.clone(), *mode);
                self.state.summary.record_dir();
            }
            CopyAction::CopyFile {
                source,
                destination,
                mode,
            } => {
                ensure_parent(destination)?;
                if self.state.resolver.overwrites() {
                    let existing = existing_kind(fs::symlink_metadata(destination));
                    if self.state.needs_removal(destination, existing, false)? {
                        fs::remove_file(destination).map_err(|e| CopyError::io(destination, e))?;
                    }
                }
                let bytes = fs::copy(source, destination).map_err(|e| CopyError::io(destination, e))?;
                if let Some(mode) = mode {
                    set_mode(destination, *mode)?;
                }
                self.state.summary.record_file(bytes);
            }
            CopyAction::CreateSymlink {
                source,
                destination,
            } => {
                ensure_parent(destination)?;
                let target = fs::read_link(source).map_err(|e| CopyError::io(source, e))?;
                let existing = existing_kind(fs::symlink_metadata(destination));
                if self.state.needs_removal(destination, existing, true)? {
                    fs::remove_file(destination).map_err(|e| CopyError::io(destination, e))?;
                }
                symlink(&target, destination)?;
                self.state.summary.record_symlink();
            }
        }
        Ok(())
    }

    /// Apply deferred directory modes and return the summary.
    pub fn finish(self) -> CopyResult<CopySummary> {
        let (modes, summary) = self.state.finish();
        for (path, mode) in modes.into_deepest_first() {
            set_mode(&path, mode)?;
        }
        info!(
            files = summary.files_copied,
            dirs = summary.directories_created,
            skipped = summary.entries_skipped,
            bytes = summary.bytes_copied,
            "copy finished"
        );
        Ok(summary)
    }
}

/// Idempotent recursive mkdir.
fn ensure_dir(path: &Path) -> CopyResult<()> {
    fs::create_dir_all(path).map_err(|e| CopyError::io(path, e))
}

fn ensure_parent(path: &Path) -> CopyResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> CopyResult<()> {
    fs::set_permissions(path, permissions(mode)).map_err(|e| CopyError::io(path, e))?;
    trace!(path = %path.display(), mode = format!("{mode:o}"), "set permissions");
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> CopyResult<()> {
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> CopyResult<()> {
    std::os::unix::fs::symlink(target, link).map_err(|e| CopyError::io(link, e))
}

#[cfg(not(unix))]
fn symlink(_target: &Path, link: &Path) -> CopyResult<()> {
    Err(CopyError::io(
        link,
        std::io::Error::new(std::io::ErrorKind::Unsupported, "symlinks are not supported"),
    ))
}

/// Executes actions with awaited `tokio::fs` calls.
#[derive(Debug)]
pub struct AsyncExecutor {
    state: ExecutionState,
}

impl AsyncExecutor {
    /// Create an executor applying `resolver` to existing file and link destinations.
    pub fn new(resolver: ConflictResolver) -> Self {
        Self {
            state: ExecutionState::new(resolver),
        }
    }

    /// Perform one action.
    pub async fn execute(&mut self, action: &CopyAction) -> CopyResult<()> {
        match action {
            CopyAction::Skip { source, reason } => self.state.skip(source, *reason),
            CopyAction::CreateDir { destination, mode } => {
                ensure_dir_async(destination).await?;
                self.state.modes.push(destination.clone(), *mode);
                self.state.summary.record_dir();
            }
            CopyAction::CopyFile {
                source,
                destination,
                mode,
            } => {
                ensure_parent_async(destination).await?;
                if self.state.resolver.overwrites() {
                    let existing = existing_kind(tokio::fs::symlink_metadata(destination).await);
                    if self.state.needs_removal(destination, existing, false)? {
                        tokio::fs::remove_file(destination)
                            .await
                            .map_err(|e| CopyError::io(destination, e))?;
                    }
                }
                let bytes = tokio::fs::copy(source, destination)
                    .await
                    .map_err(|e| CopyError::io(destination, e))?;
                if let Some(mode) = mode {
                    set_mode_async(destination, *mode).await?;
                }
                self.state.summary.record_file(bytes);
            }
            CopyAction::CreateSymlink {
                source,
                destination,
            } => {
                ensure_parent_async(destination).await?;
                let target = tokio::fs::read_link(source)
                    .await
                    .map_err(|e| CopyError::io(source, e))?;
                let existing = existing_kind(tokio::fs::symlink_metadata(destination).await);
                if self.state.needs_removal(destination, existing, true)? {
                    tokio::fs::remove_file(destination)
                        .await
                        .map_err(|e| CopyError::io(destination, e))?;
                }
                symlink_async(target, destination.clone()).await?;
                self.state.summary.record_symlink();
            }
        }
        Ok(())
    }

    /// Apply deferred directory modes and return the summary.
    pub async fn finish(self) -> CopyResult<CopySummary> {
        let (modes, summary) = self.state.finish();
        for (path, mode) in modes.into_deepest_first() {
            set_mode_async(&path, mode).await?;
        }
        info!(
            files = summary.files_copied,
            dirs = summary.directories_created,
            skipped = summary.entries_skipped,
            bytes = summary.bytes_copied,
            "copy finished"
        );
        Ok(summary)
    }
}

async fn ensure_dir_async(path: &Path) -> CopyResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| CopyError::io(path, e))
}

async fn ensure_parent_async(path: &Path) -> CopyResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_async(parent).await,
        _ => Ok(()),
    }
}

#[cfg(unix)]
async fn set_mode_async(path: &Path, mode: u32) -> CopyResult<()> {
    tokio::fs::set_permissions(path, permissions(mode))
        .await
        .map_err(|e| CopyError::io(path, e))?;
    trace!(path = %path.display(), mode = format!("{mode:o}"), "set permissions");
    Ok(())
}

#[cfg(not(unix))]
async fn set_mode_async(_path: &Path, _mode: u32) -> CopyResult<()> {
    Ok(())
}

#[cfg(unix)]
async fn symlink_async(target: PathBuf, link: PathBuf) -> CopyResult<()> {
    tokio::fs::symlink(target, &link)
        .await
        .map_err(|e| CopyError::io(link, e))
}

#[cfg(not(unix))]
async fn symlink_async(target: PathBuf, link: PathBuf) -> CopyResult<()> {
    symlink(&target, &link)
}
