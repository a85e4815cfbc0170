//! Bucket operations
//!
//! The four operations the CLI exposes. Each takes the store explicitly and
//! returns a typed outcome; rendering and exit codes belong to the caller.
//!
//! Listing is a single provider call: a truncated page is reported through
//! the `truncated` flag and never followed.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::filter::KeyFilter;
use crate::path::{ObjectPath, SCOPE_PREFIX, in_scope};
use crate::traits::{ObjectInfo, ObjectStore};

/// Keys under the scope prefix from one listing call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Objects in provider order
    pub items: Vec<ObjectInfo>,
    /// Whether the provider held back further keys
    pub truncated: bool,
    /// Token the provider returned for the next page, if truncated
    pub continuation_token: Option<String>,
}

/// Outcome of a filtered listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredListing {
    /// Number of keys the listing returned before filtering
    pub scanned: usize,
    /// Matching objects in provider order
    pub matched: Vec<ObjectInfo>,
    /// Whether the provider held back further keys
    pub truncated: bool,
    /// Token the provider returned for the next page, if truncated
    pub continuation_token: Option<String>,
}

impl FilteredListing {
    /// True when the listing itself returned nothing
    pub fn is_listing_empty(&self) -> bool {
        self.scanned == 0
    }
}

/// Outcome of an upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    /// Local file that was read
    pub file: PathBuf,
    /// Where it was stored
    pub path: ObjectPath,
    /// Metadata returned by the store
    pub info: ObjectInfo,
}

/// A key whose delete call failed
#[derive(Debug)]
pub struct DeleteFailure {
    pub key: String,
    pub error: Error,
}

/// Outcome of a filtered delete
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Number of keys the listing returned before filtering
    pub scanned: usize,
    /// Keys deleted, in the order the calls were made
    pub deleted: Vec<String>,
    /// Keys whose delete call failed
    pub failed: Vec<DeleteFailure>,
    /// Whether the provider held back further keys
    pub truncated: bool,
}

impl DeleteReport {
    /// Number of keys that matched the filter
    pub fn matched(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    /// True when at least one delete failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

async fn list_scope(store: &dyn ObjectStore, bucket: &str) -> Result<Listing> {
    tracing::debug!(bucket, prefix = SCOPE_PREFIX, "Listing objects");
    let result = store.list_objects(bucket, SCOPE_PREFIX).await?;

    if result.truncated {
        tracing::warn!(
            bucket,
            "Listing truncated by the provider; only the first page is processed"
        );
    }

    let items = result
        .items
        .into_iter()
        .filter(|item| {
            let keep = in_scope(&item.key);
            if !keep {
                tracing::warn!(key = %item.key, "Ignoring key outside {SCOPE_PREFIX}");
            }
            keep
        })
        .collect();

    Ok(Listing {
        items,
        truncated: result.truncated,
        continuation_token: result.continuation_token,
    })
}

/// List objects under the scope prefix
pub async fn list_files(store: &dyn ObjectStore, bucket: &str) -> Result<Listing> {
    list_scope(store, bucket).await
}

/// Upload a local file to `target_key`, overwriting any existing object
pub async fn upload_file(
    store: &dyn ObjectStore,
    bucket: &str,
    file_path: &Path,
    target_key: &str,
) -> Result<UploadReceipt> {
    let data = tokio::fs::read(file_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(file_path.display().to_string())
        } else {
            Error::Io(e)
        }
    })?;

    let content_type = mime_guess::from_path(file_path)
        .first()
        .map(|m| m.essence_str().to_string());

    let path = ObjectPath::new(bucket, target_key);
    tracing::debug!(
        file = %file_path.display(),
        %path,
        size = data.len(),
        content_type = content_type.as_deref().unwrap_or("-"),
        "Uploading file"
    );

    let info = store.put_object(&path, data, content_type).await?;

    Ok(UploadReceipt {
        file: file_path.to_path_buf(),
        path,
        info,
    })
}

/// List objects under the scope prefix whose key matches `filter_regex`
///
/// The pattern is compiled before the store is contacted.
pub async fn list_filtered_files(
    store: &dyn ObjectStore,
    bucket: &str,
    filter_regex: &str,
) -> Result<FilteredListing> {
    let filter = KeyFilter::new(filter_regex)?;
    let listing = list_scope(store, bucket).await?;
    let scanned = listing.items.len();

    let matched = listing
        .items
        .into_iter()
        .filter(|item| filter.matches(&item.key))
        .collect();

    Ok(FilteredListing {
        scanned,
        matched,
        truncated: listing.truncated,
        continuation_token: listing.continuation_token,
    })
}

/// Delete objects under the scope prefix whose key matches `filter_regex`
///
/// Issues one delete call per matching key. A failed delete is recorded in
/// the report and the remaining keys are still attempted.
pub async fn delete_filtered_files(
    store: &dyn ObjectStore,
    bucket: &str,
    filter_regex: &str,
) -> Result<DeleteReport> {
    let filtered = list_filtered_files(store, bucket, filter_regex).await?;

    let mut report = DeleteReport {
        scanned: filtered.scanned,
        truncated: filtered.truncated,
        ..Default::default()
    };

    for item in filtered.matched {
        let path = ObjectPath::new(bucket, &item.key);
        match store.delete_object(&path).await {
            Ok(()) => {
                tracing::debug!(%path, "Deleted object");
                report.deleted.push(item.key);
            }
            Err(error) => {
                tracing::warn!(%path, %error, "Failed to delete object");
                report.failed.push(DeleteFailure {
                    key: item.key,
                    error,
                });
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ListResult, MockObjectStore};
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn page(keys: &[&str]) -> ListResult {
        ListResult {
            items: keys.iter().map(|k| ObjectInfo::new(*k)).collect(),
            truncated: false,
            continuation_token: None,
        }
    }

    fn keys(items: &[ObjectInfo]) -> Vec<&str> {
        items.iter().map(|i| i.key.as_str()).collect()
    }

    fn demo_store() -> MockObjectStore {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .withf(|bucket: &str, prefix: &str| bucket == "demo" && prefix == SCOPE_PREFIX)
            .times(1)
            .returning(|_, _| Ok(page(&["b-wing/a.txt", "b-wing/b.log"])));
        store
    }

    /// In-memory store with optional per-key delete failures
    #[derive(Default)]
    struct MemoryStore {
        objects: Mutex<BTreeMap<String, Vec<u8>>>,
        fail_deletes: HashSet<String>,
        delete_calls: Mutex<Vec<String>>,
    }

    impl MemoryStore {
        fn with_keys(keys: &[&str]) -> Self {
            let store = Self::default();
            {
                let mut objects = store.objects.lock().unwrap();
                for key in keys {
                    objects.insert(key.to_string(), Vec::new());
                }
            }
            store
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn list_objects(&self, _bucket: &str, prefix: &str) -> Result<ListResult> {
            let objects = self.objects.lock().unwrap();
            Ok(ListResult {
                items: objects
                    .iter()
                    .filter(|(k, _)| k.starts_with(prefix))
                    .map(|(k, v)| ObjectInfo::file(k.clone(), v.len() as i64))
                    .collect(),
                ..Default::default()
            })
        }

        async fn put_object(
            &self,
            path: &ObjectPath,
            data: Vec<u8>,
            content_type: Option<String>,
        ) -> Result<ObjectInfo> {
            let size = data.len() as i64;
            self.objects.lock().unwrap().insert(path.key.clone(), data);
            let mut info = ObjectInfo::file(&path.key, size);
            info.content_type = content_type;
            Ok(info)
        }

        async fn delete_object(&self, path: &ObjectPath) -> Result<()> {
            self.delete_calls.lock().unwrap().push(path.key.clone());
            if self.fail_deletes.contains(&path.key) {
                return Err(Error::Auth(format!("AccessDenied: {path}")));
            }
            self.objects.lock().unwrap().remove(&path.key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_list_files_provider_order() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .times(1)
            .returning(|_, _| Ok(page(&["b-wing/z.txt", "b-wing/a.txt", "b-wing/m.txt"])));

        let listing = list_files(&store, "demo").await.unwrap();
        assert_eq!(
            keys(&listing.items),
            vec!["b-wing/z.txt", "b-wing/a.txt", "b-wing/m.txt"]
        );
        assert!(!listing.truncated);
    }

    #[tokio::test]
    async fn test_list_files_empty() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Ok(ListResult::default()));

        let listing = list_files(&store, "demo").await.unwrap();
        assert!(listing.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_files_reports_truncation() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().times(1).returning(|_, _| {
            Ok(ListResult {
                truncated: true,
                continuation_token: Some("next".into()),
                ..page(&["b-wing/a.txt"])
            })
        });

        let listing = list_files(&store, "demo").await.unwrap();
        assert!(listing.truncated);
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.continuation_token.as_deref(), Some("next"));
    }

    #[tokio::test]
    async fn test_list_files_propagates_error() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|bucket, _| Err(Error::NotFound(format!("Bucket not found: {bucket}"))));

        let result = list_files(&store, "missing").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_filtered_scenario() {
        let store = demo_store();

        let filtered = list_filtered_files(&store, "demo", r"\.log$").await.unwrap();
        assert_eq!(filtered.scanned, 2);
        assert_eq!(keys(&filtered.matched), vec!["b-wing/b.log"]);
        assert!(!filtered.is_listing_empty());
    }

    #[tokio::test]
    async fn test_list_filtered_preserves_order() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().returning(|_, _| {
            Ok(page(&[
                "b-wing/2024/c.csv",
                "b-wing/2023/a.csv",
                "b-wing/notes.txt",
                "b-wing/2024/b.csv",
            ]))
        });

        let filtered = list_filtered_files(&store, "demo", r"\d{4}/").await.unwrap();
        assert_eq!(
            keys(&filtered.matched),
            vec!["b-wing/2024/c.csv", "b-wing/2023/a.csv", "b-wing/2024/b.csv"]
        );
    }

    #[tokio::test]
    async fn test_list_filtered_no_match_is_not_empty_listing() {
        let store = demo_store();

        let filtered = list_filtered_files(&store, "demo", "nothing").await.unwrap();
        assert!(filtered.matched.is_empty());
        assert!(!filtered.is_listing_empty());
    }

    #[tokio::test]
    async fn test_list_filtered_invalid_pattern_skips_listing() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().never();

        let result = list_filtered_files(&store, "demo", "(unclosed").await;
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }

    #[tokio::test]
    async fn test_out_of_scope_keys_are_ignored() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Ok(page(&["b-wing/a.log", "other/b.log"])));
        store
            .expect_delete_object()
            .withf(|path: &ObjectPath| path.key == "b-wing/a.log")
            .times(1)
            .returning(|_| Ok(()));

        let report = delete_filtered_files(&store, "demo", "log").await.unwrap();
        assert_eq!(report.deleted, vec!["b-wing/a.log".to_string()]);
        assert_eq!(report.scanned, 1);
    }

    #[tokio::test]
    async fn test_delete_filtered_scenario() {
        let mut store = demo_store();
        store
            .expect_delete_object()
            .withf(|path: &ObjectPath| path.bucket == "demo" && path.key == "b-wing/b.log")
            .times(1)
            .returning(|_| Ok(()));

        let report = delete_filtered_files(&store, "demo", r"\.log$").await.unwrap();
        assert_eq!(report.deleted, vec!["b-wing/b.log".to_string()]);
        assert_eq!(report.matched(), 1);
        assert!(!report.has_failures());
    }

    #[tokio::test]
    async fn test_delete_filtered_invalid_pattern_deletes_nothing() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().never();
        store.expect_delete_object().never();

        let result = delete_filtered_files(&store, "demo", "[a-").await;
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }

    #[tokio::test]
    async fn test_delete_filtered_no_match() {
        let mut store = demo_store();
        store.expect_delete_object().never();

        let report = delete_filtered_files(&store, "demo", r"\.csv$").await.unwrap();
        assert_eq!(report.matched(), 0);
        assert_eq!(report.scanned, 2);
    }

    #[tokio::test]
    async fn test_delete_filtered_continues_after_failure() {
        let mut store = MemoryStore::with_keys(&["b-wing/a.log", "b-wing/b.log", "b-wing/c.log"]);
        store.fail_deletes.insert("b-wing/b.log".to_string());

        let report = delete_filtered_files(&store, "demo", "log").await.unwrap();
        assert_eq!(
            report.deleted,
            vec!["b-wing/a.log".to_string(), "b-wing/c.log".to_string()]
        );
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].key, "b-wing/b.log");
        assert!(matches!(report.failed[0].error, Error::Auth(_)));
        assert_eq!(report.matched(), 3);

        let calls = store.delete_calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["b-wing/a.log", "b-wing/b.log", "b-wing/c.log"]);
    }

    #[tokio::test]
    async fn test_delete_filtered_leaves_non_matching() {
        let store = MemoryStore::with_keys(&["b-wing/a.txt", "b-wing/b.log"]);

        delete_filtered_files(&store, "demo", r"\.log$").await.unwrap();

        let listing = list_files(&store, "demo").await.unwrap();
        assert_eq!(keys(&listing.items), vec!["b-wing/a.txt"]);
        assert_eq!(*store.delete_calls.lock().unwrap(), vec!["b-wing/b.log"]);
    }

    #[tokio::test]
    async fn test_upload_overwrites_existing_key() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.txt");
        let second = temp_dir.path().join("second.txt");
        std::fs::write(&first, b"one").unwrap();
        std::fs::write(&second, b"second version").unwrap();

        let store = MemoryStore::default();
        upload_file(&store, "demo", &first, "b-wing/report.txt")
            .await
            .unwrap();
        upload_file(&store, "demo", &second, "b-wing/report.txt")
            .await
            .unwrap();

        let listing = list_files(&store, "demo").await.unwrap();
        assert_eq!(keys(&listing.items), vec!["b-wing/report.txt"]);
        assert_eq!(listing.items[0].size_bytes, Some(14));
    }

    #[tokio::test]
    async fn test_upload_receipt_and_content_type() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("data.json");
        std::fs::write(&file, br#"{"ok":true}"#).unwrap();

        let mut store = MockObjectStore::new();
        store
            .expect_put_object()
            .withf(|path: &ObjectPath, data: &Vec<u8>, content_type: &Option<String>| {
                path.bucket == "demo"
                    && path.key == "b-wing/data.json"
                    && data.as_slice() == br#"{"ok":true}"#
                    && content_type.as_deref() == Some("application/json")
            })
            .times(1)
            .returning(|path, data, _| Ok(ObjectInfo::file(&path.key, data.len() as i64)));

        let receipt = upload_file(&store, "demo", &file, "b-wing/data.json")
            .await
            .unwrap();
        assert_eq!(receipt.file, file);
        assert_eq!(receipt.path, ObjectPath::new("demo", "b-wing/data.json"));
        assert_eq!(receipt.info.size_bytes, Some(11));
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.txt");

        let mut store = MockObjectStore::new();
        store.expect_put_object().never();

        let result = upload_file(&store, "demo", &missing, "b-wing/nope.txt").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
