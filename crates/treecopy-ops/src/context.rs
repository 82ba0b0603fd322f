//! Working-directory context for resolving relative copy paths.

use std::path::{Component, Path, PathBuf};

use treecopy_core::{CopyError, CopyOptions, CopyRequest, CopyResult, CopySummary};

use crate::copy::{copy_request, copy_request_async};

/// A directory that relative paths are resolved against.
///
/// The context is immutable; [`CopyContext::cwd`] derives a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyContext {
    root: PathBuf,
}

impl CopyContext {
    /// Create a context rooted at `root` (normalized lexically).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize(&root.into()),
        }
    }

    /// Context for the process working directory.
    pub fn current() -> CopyResult<Self> {
        std::env::current_dir()
            .map(Self::new)
            .map_err(|e| CopyError::io(".", e))
    }

    /// The context directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Derive a context for `path`, relative to this one.
    pub fn cwd(&self, path: impl AsRef<Path>) -> Self {
        Self {
            root: self.path(path),
        }
    }

    /// Resolve `path` against the context directory.
    pub fn path(&self, path: impl AsRef<Path>) -> PathBuf {
        normalize(&self.root.join(path))
    }

    /// Build a request with both paths resolved.
    pub fn request(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        options: &CopyOptions,
    ) -> CopyRequest {
        CopyRequest::new(self.path(source), self.path(destination), options.clone())
    }

    /// Blocking copy with paths relative to this context.
    pub fn copy(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        options: &CopyOptions,
    ) -> CopyResult<CopySummary> {
        copy_request(&self.request(source, destination, options))
    }

    /// Async copy with paths relative to this context.
    pub async fn copy_async(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        options: &CopyOptions,
    ) -> CopyResult<CopySummary> {
        let request = self.request(source, destination, options);
        copy_request_async(&request).await
    }
}

/// Drop `.` components and fold `..` into its parent without touching the
/// filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_resolution() {
        let ctx = CopyContext::new("/work");
        assert_eq!(ctx.path("a/b.txt"), PathBuf::from("/work/a/b.txt"));
        assert_eq!(ctx.path("/abs/x"), PathBuf::from("/abs/x"));
        assert_eq!(ctx.path("./a/../b"), PathBuf::from("/work/b"));
    }

    #[test]
    fn test_derived_context() {
        let ctx = CopyContext::new("/work").cwd("a");
        assert_eq!(ctx.root(), Path::new("/work/a"));
        assert_eq!(ctx.path("x.txt"), PathBuf::from("/work/a/x.txt"));
        assert_eq!(ctx.cwd("..").root(), Path::new("/work"));
    }

    #[test]
    fn test_root_parent_stays_at_root() {
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }
}
