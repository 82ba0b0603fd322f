//! Copy configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Deserializer, Serialize};

/// Options controlling a single copy invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), default)]
pub struct CopyOptions {
    /// Replace existing destination files and merge into existing directories.
    #[serde(default)]
    pub overwrite: bool,

    /// Ordered glob patterns selecting what to copy (empty = everything).
    ///
    /// `!` negates a pattern, `./` anchors it to the copy root. Accepts a
    /// single string or a list when deserialized.
    #[serde(default, deserialize_with = "one_or_many")]
    pub matching: Vec<String>,
}

impl CopyOptions {
    /// Create a copy options builder.
    pub fn builder() -> CopyOptionsBuilder {
        CopyOptionsBuilder::default()
    }

    /// Default options: no overwrite, copy everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether existing destinations may be overwritten.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Replace the matching patterns.
    pub fn with_matching<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matching = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Whether any filtering is configured.
    pub fn is_filtered(&self) -> bool {
        !self.matching.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(pattern) => vec![pattern],
        OneOrMany::Many(patterns) => patterns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = CopyOptions::builder()
            .overwrite(true)
            .matching(vec!["*.txt".to_string()])
            .build()
            .unwrap();

        assert!(options.overwrite);
        assert_eq!(options.matching, vec!["*.txt"]);
    }

    #[test]
    fn test_options_default() {
        let options = CopyOptions::new();
        assert!(!options.overwrite);
        assert!(!options.is_filtered());
    }

    #[test]
    fn test_options_chaining() {
        let options = CopyOptions::new()
            .with_overwrite(true)
            .with_matching(["b", "!c"]);
        assert!(options.overwrite);
        assert_eq!(options.matching, vec!["b", "!c"]);
        assert!(options.is_filtered());
    }
}
