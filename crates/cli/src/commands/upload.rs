//! upload - Upload a local file to a key
//!
//! The object at the target key is replaced unconditionally.

use std::path::Path;

use bc_core::{ObjectStore, UploadReceipt, upload_file};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

#[derive(Debug, Serialize)]
struct UploadOutput {
    status: &'static str,
    file: String,
    bucket: String,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
}

/// Execute the upload operation
pub async fn execute(
    store: &dyn ObjectStore,
    bucket: &str,
    file: &Path,
    target: &str,
    formatter: &Formatter,
) -> ExitCode {
    let receipt = match upload_file(store, bucket, file, target).await {
        Ok(r) => r,
        Err(e) => {
            formatter.error(&format!("Error uploading file: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&UploadOutput {
            status: "success",
            file: receipt.file.display().to_string(),
            bucket: receipt.path.bucket.clone(),
            key: receipt.path.key.clone(),
            size_bytes: receipt.info.size_bytes,
            etag: receipt.info.etag.clone(),
            content_type: receipt.info.content_type.clone(),
        });
    } else {
        formatter.println(&render(&receipt));
    }

    ExitCode::Success
}

fn render(receipt: &UploadReceipt) -> String {
    format!(
        "File {} uploaded as {} in bucket {}.",
        receipt.file.display(),
        receipt.path.key,
        receipt.path.bucket
    )
}
