//! Depth-first tree walkers.
//!
//! Both walkers yield the root first, then every entry before its children,
//! with siblings in file-name order. Symlinks are reported, never followed.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use treecopy_core::{CopyError, CopyResult, WalkEntry};

type JwalkEntry = Result<jwalk::DirEntry<((), ())>, jwalk::Error>;

/// Map a failed root lookup, keeping `NotFound` distinct from other I/O errors.
fn root_error(root: &Path, err: io::Error) -> CopyError {
    if err.kind() == io::ErrorKind::NotFound {
        CopyError::NotFound {
            path: root.to_path_buf(),
        }
    } else {
        CopyError::io(root, err)
    }
}

fn jwalk_error(root: &Path, err: jwalk::Error) -> CopyError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
    let kind = err.io_error().map_or(io::ErrorKind::Other, io::Error::kind);
    CopyError::io(path, io::Error::new(kind, err.to_string()))
}

/// Blocking walker built on jwalk.
pub struct TreeWalker {
    root: PathBuf,
    state: WalkState,
}

enum WalkState {
    /// A non-directory root yields exactly one entry.
    Single(Option<WalkEntry>),
    Tree(Box<dyn Iterator<Item = JwalkEntry>>),
    Done,
}

impl TreeWalker {
    /// Start walking `root`.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::NotFound`] if `root` does not exist.
    pub fn new(root: impl Into<PathBuf>) -> CopyResult<Self> {
        let root = root.into();
        let metadata = fs::symlink_metadata(&root).map_err(|e| root_error(&root, e))?;

        let state = if metadata.is_dir() {
            let walker = WalkDir::new(&root)
                .parallelism(Parallelism::Serial)
                .sort(true)
                .skip_hidden(false)
                .follow_links(false);
            WalkState::Tree(Box::new(walker.into_iter()))
        } else {
            WalkState::Single(Some(WalkEntry::from_metadata(
                &root,
                root.clone(),
                0,
                &metadata,
            )))
        };

        Ok(Self { root, state })
    }
}

impl Iterator for TreeWalker {
    type Item = CopyResult<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match &mut self.state {
            WalkState::Single(entry) => return entry.take().map(Ok),
            WalkState::Done => return None,
            WalkState::Tree(iter) => {
                let entry = iter.next()?;
                entry.map_err(|e| jwalk_error(&self.root, e)).and_then(|entry| {
                    let path = entry.path();
                    let metadata = entry
                        .metadata()
                        .map_err(|e| jwalk_error(&self.root, e))?;
                    Ok(WalkEntry::from_metadata(&self.root, path, entry.depth, &metadata))
                })
            }
        };

        // Stop at the first error.
        if result.is_err() {
            self.state = WalkState::Done;
        }
        Some(result)
    }
}

/// Async walker built on `tokio::fs`.
///
/// Every stat and directory read is an await point. The traversal order
/// matches [`TreeWalker`].
#[derive(Debug)]
pub struct AsyncTreeWalker {
    root: PathBuf,
    stack: Vec<(PathBuf, usize)>,
}

impl AsyncTreeWalker {
    /// Start walking `root`.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::NotFound`] if `root` does not exist.
    pub async fn new(root: impl Into<PathBuf>) -> CopyResult<Self> {
        let root = root.into();
        tokio::fs::symlink_metadata(&root)
            .await
            .map_err(|e| root_error(&root, e))?;

        Ok(Self {
            stack: vec![(root.clone(), 0)],
            root,
        })
    }

    /// Fetch the next entry, or `None` once the tree is exhausted.
    pub async fn next_entry(&mut self) -> Option<CopyResult<WalkEntry>> {
        let (path, depth) = self.stack.pop()?;
        let result = self.visit(path, depth).await;
        if result.is_err() {
            self.stack.clear();
        }
        Some(result)
    }

    async fn visit(&mut self, path: PathBuf, depth: usize) -> CopyResult<WalkEntry> {
        let metadata = tokio::fs::symlink_metadata(&path)
            .await
            .map_err(|e| CopyError::io(&path, e))?;

        if metadata.is_dir() {
            let mut names = read_dir_names(&path).await?;
            names.sort();
            // Reverse so the smallest name is popped first.
            self.stack
                .extend(names.into_iter().rev().map(|name| (path.join(name), depth + 1)));
        }

        Ok(WalkEntry::from_metadata(&self.root, path, depth, &metadata))
    }
}

async fn read_dir_names(dir: &Path) -> CopyResult<Vec<OsString>> {
    let mut read_dir = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| CopyError::io(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| CopyError::io(dir, e))?
    {
        names.push(entry.file_name());
    }
    Ok(names)
}
