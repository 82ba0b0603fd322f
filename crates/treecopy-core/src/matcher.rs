//! Glob matching over paths relative to the copy root.
//!
//! Patterns are evaluated in declaration order and the last one whose glob
//! matches decides. A leading `!` turns a pattern into an exclusion, a
//! leading `./` anchors it to the copy root. Unanchored patterns may match
//! any trailing chain of segments, so `file.txt` matches `a/b/file.txt` and
//! `b/*.txt` matches `a/b/x.txt`.

use globset::{GlobBuilder, GlobMatcher};

use crate::error::{CopyError, CopyResult};

/// A single compiled pattern.
#[derive(Debug, Clone)]
struct CompiledPattern {
    glob: GlobMatcher,
    anchored: bool,
    negated: bool,
}

impl CompiledPattern {
    fn compile(raw: &str) -> CopyResult<Self> {
        let (negated, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (anchored, body) = match body.strip_prefix("./") {
            Some(rest) => (true, rest),
            None => (false, body),
        };

        let glob = GlobBuilder::new(body)
            .literal_separator(true)
            .build()
            .map_err(|source| CopyError::InvalidPattern {
                pattern: raw.to_string(),
                source,
            })?
            .compile_matcher();

        Ok(Self {
            glob,
            anchored,
            negated,
        })
    }

    fn is_match(&self, path: &str) -> bool {
        if self.anchored {
            self.glob.is_match(path)
        } else {
            trailing_chains(path).any(|chain| self.glob.is_match(chain))
        }
    }
}

/// `a/b/c` yields `a/b/c`, `b/c`, `c`.
fn trailing_chains(path: &str) -> impl Iterator<Item = &str> {
    std::iter::once(path).chain(path.match_indices('/').map(move |(i, _)| &path[i + 1..]))
}

/// Compiled inclusion/exclusion predicate.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    patterns: Vec<CompiledPattern>,
    unmatched: bool,
}

impl PathMatcher {
    /// Compile an ordered list of patterns.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::InvalidPattern`] for the first pattern that is not
    /// valid glob syntax.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> CopyResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| CompiledPattern::compile(p.as_ref()))
            .collect::<CopyResult<Vec<_>>>()?;

        // Paths no pattern speaks about are kept only when every pattern is
        // an exclusion.
        let unmatched = patterns.iter().all(|p| p.negated);

        Ok(Self {
            patterns,
            unmatched,
        })
    }

    /// A matcher that accepts everything.
    pub fn all() -> Self {
        Self {
            patterns: Vec::new(),
            unmatched: true,
        }
    }

    /// Decide whether the `/`-separated relative path is selected.
    pub fn matches(&self, relative_path: &str) -> bool {
        self.patterns
            .iter()
            .rev()
            .find(|p| p.is_match(relative_path))
            .map_or(self.unmatched, |p| !p.negated)
    }

    /// Whether no patterns were given.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(patterns: &[&str]) -> PathMatcher {
        PathMatcher::new(patterns).unwrap()
    }

    #[test]
    fn test_empty_matches_everything() {
        let m = matcher(&[]);
        assert!(m.is_empty());
        assert!(m.matches("a"));
        assert!(m.matches("a/b/c.md"));
    }

    #[test]
    fn test_unanchored_matches_at_any_depth() {
        let m = matcher(&["*.txt"]);
        assert!(m.matches("file.txt"));
        assert!(m.matches("a/file.txt"));
        assert!(m.matches("a/b/file.txt"));
        assert!(!m.matches("a/b/file.md"));
        assert!(!m.matches("a"));
    }

    #[test]
    fn test_unanchored_multi_segment_matches_trailing_chain() {
        let m = matcher(&["b/*.txt"]);
        assert!(m.matches("a/b/x.txt"));
        assert!(m.matches("b/x.txt"));
        assert!(!m.matches("b/c/x.txt"));
    }

    #[test]
    fn test_anchored_matches_full_path_only() {
        let m = matcher(&["./a/*.txt"]);
        assert!(m.matches("a/file.txt"));
        assert!(!m.matches("file.txt"));
        assert!(!m.matches("a/b/file.txt"));
        assert!(!m.matches("x/a/file.txt"));
    }

    #[test]
    fn test_star_does_not_cross_separator() {
        let m = matcher(&["./*"]);
        assert!(m.matches("a"));
        assert!(!m.matches("a/b"));

        let m = matcher(&["./**"]);
        assert!(m.matches("a/b"));
    }

    #[test]
    fn test_negation_after_positive_reexcludes() {
        let m = matcher(&["b", "!c"]);
        assert!(m.matches("a/b"));
        assert!(!m.matches("a/c"));
        assert!(!m.matches("a"));

        let m = matcher(&["*.txt", "!secret.txt"]);
        assert!(m.matches("a/notes.txt"));
        assert!(!m.matches("a/secret.txt"));
    }

    #[test]
    fn test_last_match_wins() {
        let m = matcher(&["!keep.txt", "*.txt"]);
        assert!(m.matches("keep.txt"));

        let m = matcher(&["*.txt", "!keep.txt", "keep.txt"]);
        assert!(m.matches("dir/keep.txt"));
    }

    #[test]
    fn test_only_negations_keep_unmatched() {
        let m = matcher(&["!*.md"]);
        assert!(m.matches("a/file.txt"));
        assert!(!m.matches("a/file.md"));
    }

    #[test]
    fn test_dot_files_are_not_special() {
        let m = matcher(&["*"]);
        assert!(m.matches(".hidden"));
        assert!(m.matches("a/.env"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = PathMatcher::new(&["a[", "*.txt"]).unwrap_err();
        assert_eq!(err.code(), "EINVAL");
        assert!(matches!(err, CopyError::InvalidPattern { ref pattern, .. } if pattern == "a["));
    }

    #[test]
    fn test_trailing_chains() {
        let chains: Vec<_> = trailing_chains("a/b/c").collect();
        assert_eq!(chains, vec!["a/b/c", "b/c", "c"]);
        assert_eq!(trailing_chains("x").collect::<Vec<_>>(), vec!["x"]);
    }
}
