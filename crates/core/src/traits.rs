//! ObjectStore trait definition
//!
//! This trait defines the three provider capabilities the operations need.
//! It keeps the operations decoupled from the specific S3 SDK implementation.

use async_trait::async_trait;
use jiff::Timestamp;
use serde::Serialize;

use crate::error::Result;
use crate::path::ObjectPath;

/// Metadata for a listed or uploaded object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Storage class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Content type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ObjectInfo {
    /// Create an ObjectInfo carrying only a key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes: None,
            size_human: None,
            last_modified: None,
            etag: None,
            storage_class: None,
            content_type: None,
        }
    }

    /// Create an ObjectInfo with a known size
    pub fn file(key: impl Into<String>, size: i64) -> Self {
        Self {
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size.max(0) as u64, humansize::BINARY)),
            ..Self::new(key)
        }
    }
}

/// Result of a single list call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListResult {
    /// Listed objects, in provider order
    pub items: Vec<ObjectInfo>,

    /// Whether the provider had more keys than it returned
    pub truncated: bool,

    /// Continuation token reported by the provider (never followed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

/// Trait for the storage provider's object API
///
/// Implemented by the S3 adapter and mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one page of objects whose key starts with `prefix`
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<ListResult>;

    /// Store `data` at `path`, replacing any existing object
    async fn put_object(
        &self,
        path: &ObjectPath,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Delete the object at `path`
    async fn delete_object(&self, path: &ObjectPath) -> Result<()>;
}
