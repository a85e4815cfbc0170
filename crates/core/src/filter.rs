//! Regex key filter
//!
//! A [`KeyFilter`] tests the full key with search semantics: the pattern may
//! match anywhere in the key unless it anchors itself with `^` or `$`.

use regex::Regex;

use crate::error::Result;

/// A compiled key filter
#[derive(Debug, Clone)]
pub struct KeyFilter {
    regex: Regex,
}

impl KeyFilter {
    /// Compile a filter from a pattern string
    ///
    /// Returns [`crate::Error::InvalidPattern`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        Ok(Self { regex })
    }

    /// Check whether the pattern matches anywhere in `key`
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}
