//! delete-filtered - Delete keys under the scope prefix matching a regex
//!
//! One delete call per matching key, no dry run. A failed delete is reported
//! and the remaining keys are still attempted.

use bc_core::{DeleteReport, ObjectStore, delete_filtered_files};
use serde::Serialize;

use super::list::TRUNCATED_WARNING;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Printed when no key matched the filter
pub const NO_MATCH_MESSAGE: &str = "No files found matching the filter.";

#[derive(Debug, Serialize)]
struct DeleteOutput<'a> {
    status: &'static str,
    bucket: &'a str,
    filter: &'a str,
    deleted: &'a [String],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<FailedKey<'a>>,
    total: usize,
    truncated: bool,
}

#[derive(Debug, Serialize)]
struct FailedKey<'a> {
    key: &'a str,
    error: String,
}

/// Execute the delete-filtered operation
pub async fn execute(
    store: &dyn ObjectStore,
    bucket: &str,
    filter: &str,
    formatter: &Formatter,
) -> ExitCode {
    let report = match delete_filtered_files(store, bucket, filter).await {
        Ok(r) => r,
        Err(e) => {
            formatter.error(&format!("Error deleting files: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&DeleteOutput {
            status: if report.has_failures() {
                "partial"
            } else {
                "success"
            },
            bucket,
            filter,
            deleted: &report.deleted,
            failed: report
                .failed
                .iter()
                .map(|f| FailedKey {
                    key: &f.key,
                    error: f.error.to_string(),
                })
                .collect(),
            total: report.deleted.len(),
            truncated: report.truncated,
        });
    } else {
        formatter.lines(&render(&report));
        for line in render_failures(&report) {
            formatter.error(&line);
        }
        if report.truncated {
            formatter.warning(TRUNCATED_WARNING);
        }
    }

    if report.has_failures() {
        ExitCode::GeneralError
    } else {
        ExitCode::Success
    }
}

/// Confirmation lines for deleted keys
fn render(report: &DeleteReport) -> Vec<String> {
    if report.matched() == 0 {
        return vec![NO_MATCH_MESSAGE.to_string()];
    }
    report
        .deleted
        .iter()
        .map(|key| format!("Deleted file: {key}"))
        .collect()
}

fn render_failures(report: &DeleteReport) -> Vec<String> {
    report
        .failed
        .iter()
        .map(|f| format!("Error deleting file {}: {}", f.key, f.error))
        .collect()
}
