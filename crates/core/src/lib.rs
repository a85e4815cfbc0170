//! bc-core: Core library for the bucketctl S3 CLI
//!
//! This crate provides the core functionality for bucketctl, including:
//! - Configuration loading from the environment
//! - The scope prefix and object paths
//! - Regex key filtering
//! - ObjectStore trait for provider operations
//! - The list, upload, filtered-list and filtered-delete operations
//!
//! This crate is independent of any specific S3 SDK, so the operations can
//! be tested against in-memory or mocked stores.

pub mod config;
pub mod error;
pub mod filter;
pub mod ops;
pub mod path;
pub mod traits;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::KeyFilter;
pub use ops::{
    DeleteFailure, DeleteReport, FilteredListing, Listing, UploadReceipt, delete_filtered_files,
    list_files, list_filtered_files, upload_file,
};
pub use path::{ObjectPath, SCOPE_PREFIX, in_scope};
pub use traits::{ListResult, ObjectInfo, ObjectStore};
