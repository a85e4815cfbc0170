//! Object paths and the listing scope
//!
//! Every listing, filter and delete is confined to keys under [`SCOPE_PREFIX`].
//! The prefix is fixed at compile time so the tool can never reach the rest
//! of a shared bucket.

/// Prefix that scopes listing, filtering and deletion
pub const SCOPE_PREFIX: &str = "b-wing/";

/// Check whether a key lies under [`SCOPE_PREFIX`]
pub fn in_scope(key: &str) -> bool {
    key.starts_with(SCOPE_PREFIX)
}

/// A single object location: bucket plus key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
}

impl ObjectPath {
    /// Create a new ObjectPath
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}
