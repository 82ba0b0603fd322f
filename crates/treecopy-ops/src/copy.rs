//! Copy entry points, blocking and async.
//!
//! Both modes run the same sequence: compile the patterns, check the source,
//! check the destination root against the overwrite policy, reject a
//! destination inside the source, then walk, plan and execute entry by entry. Nothing is written before all checks pass.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use treecopy_core::{ConflictKind, CopyError, CopyOptions, CopyRequest, CopyResult, CopySummary};

use crate::context::CopyContext;
use crate::executor::{AsyncExecutor, BlockingExecutor};
use crate::walk::{AsyncTreeWalker, TreeWalker};

/// Copy `source` to `destination`, resolving relative paths against the
/// process working directory. Blocks until the whole tree is copied.
pub fn copy(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &CopyOptions,
) -> CopyResult<CopySummary> {
    CopyContext::current()?.copy(source, destination, options)
}

/// Async counterpart of [`copy`].
pub async fn copy_async(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &CopyOptions,
) -> CopyResult<CopySummary> {
    let request = CopyContext::current()?.request(source, destination, options);
    copy_request_async(&request).await
}

/// Stat `path` without following links; `None` when it does not exist.
fn stat_if_exists(path: &Path, result: io::Result<fs::Metadata>) -> CopyResult<Option<fs::Metadata>> {
    match result {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CopyError::io(path, e)),
    }
}

/// Run every check that precedes the first write.
fn preflight(
    request: &CopyRequest,
    source: Option<fs::Metadata>,
    destination: Option<fs::Metadata>,
) -> CopyResult<()> {
    request.check_source(source.is_some())?;
    let resolved = request.check_destination(destination.as_ref().map(ConflictKind::from_metadata))?;
    // An existing destination without overwrite is EEXIST, never EINVAL.
    request.check_nesting(source.is_some_and(|m| m.is_dir()))?;
    debug!(
        source = %request.source().display(),
        destination = %request.destination().display(),
        ?resolved,
        "starting copy"
    );
    Ok(())
}

/// Execute a prepared request in blocking mode.
pub fn copy_request(request: &CopyRequest) -> CopyResult<CopySummary> {
    let planner = request.planner()?;
    let source = stat_if_exists(request.source(), fs::symlink_metadata(request.source()))?;
    let destination = stat_if_exists(request.destination(), fs::symlink_metadata(request.destination()))?;
    preflight(request, source, destination)?;

    let mut executor = BlockingExecutor::new(request.resolver());
    for entry in TreeWalker::new(request.source())? {
        let action = planner.plan(&entry?);
        executor.execute(&action)?;
    }
    executor.finish()
}

/// Execute a prepared request in async mode.
pub async fn copy_request_async(request: &CopyRequest) -> CopyResult<CopySummary> {
    let planner = request.planner()?;
    let source = stat_if_exists(
        request.source(),
        tokio::fs::symlink_metadata(request.source()).await,
    )?;
    let destination = stat_if_exists(
        request.destination(),
        tokio::fs::symlink_metadata(request.destination()).await,
    )?;
    preflight(request, source, destination)?;

    let mut executor = AsyncExecutor::new(request.resolver());
    let mut walker = AsyncTreeWalker::new(request.source()).await?;
    while let Some(entry) = walker.next_entry().await {
        let action = planner.plan(&entry?);
        executor.execute(&action).await?;
    }
    executor.finish().await
}
