//! Copy engine for treecopy.
//!
//! This crate walks a source tree and reproduces it at a destination, either
//! blocking the caller ([`copy`]) or as a future ([`copy_async`]). Planning
//! and filtering come from `treecopy-core`; only the filesystem calls differ
//! between the two modes, so both produce the same tree and the same errors.
//!
//! # Example
//!
//! ```rust,no_run
//! use treecopy_ops::{CopyOptions, copy};
//!
//! let options = CopyOptions::new().with_matching(["*.txt", "!secret.txt"]);
//! let summary = copy("notes", "backup/notes", &options).unwrap();
//! println!("{}", summary.summary());
//! ```
//!
//! # Async
//!
//! ```rust,no_run
//! use treecopy_ops::{CopyContext, CopyOptions};
//!
//! # async fn run() -> treecopy_ops::CopyResult<()> {
//! let ctx = CopyContext::new("/srv/data").cwd("incoming");
//! ctx.copy_async("batch", "../archive/batch", &CopyOptions::new().with_overwrite(true))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod copy;
mod executor;
mod walk;

pub use context::CopyContext;
pub use copy::{copy, copy_async, copy_request, copy_request_async};
pub use executor::{AsyncExecutor, BlockingExecutor};
pub use walk::{AsyncTreeWalker, TreeWalker};

// Re-export core types for convenience
pub use treecopy_core::{
    CopyAction, CopyError, CopyOptions, CopyRequest, CopyResult, CopySummary, EntryKind,
    PathMatcher, WalkEntry,
};
