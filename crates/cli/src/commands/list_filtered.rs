//! list-filtered - List keys under the scope prefix matching a regex

use bc_core::{FilteredListing, ObjectInfo, ObjectStore, SCOPE_PREFIX, list_filtered_files};
use serde::Serialize;

use super::list::TRUNCATED_WARNING;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Printed when the listing returns nothing
pub const EMPTY_MESSAGE: &str = "The bucket is empty or does not exist.";

#[derive(Debug, Serialize)]
struct ListFilteredOutput<'a> {
    bucket: &'a str,
    prefix: &'a str,
    filter: &'a str,
    items: &'a [ObjectInfo],
    scanned: usize,
    truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    continuation_token: Option<&'a str>,
}

impl<'a> ListFilteredOutput<'a> {
    fn new(bucket: &'a str, filter: &'a str, filtered: &'a FilteredListing) -> Self {
        Self {
            bucket,
            prefix: SCOPE_PREFIX,
            filter,
            items: &filtered.matched,
            scanned: filtered.scanned,
            truncated: filtered.truncated,
            continuation_token: filtered.continuation_token.as_deref(),
        }
    }
}

/// Execute the list-filtered operation
pub async fn execute(
    store: &dyn ObjectStore,
    bucket: &str,
    filter: &str,
    formatter: &Formatter,
) -> ExitCode {
    let filtered = match list_filtered_files(store, bucket, filter).await {
        Ok(f) => f,
        Err(e) => {
            formatter.error(&format!("Error filtering files: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&ListFilteredOutput::new(bucket, filter, &filtered));
    } else {
        formatter.lines(&render(&filtered));
        if filtered.truncated {
            formatter.warning(TRUNCATED_WARNING);
        }
    }

    ExitCode::Success
}

/// Human-readable lines for a filtered listing
///
/// A non-empty listing with no matches prints nothing.
fn render(filtered: &FilteredListing) -> Vec<String> {
    if filtered.is_listing_empty() {
        return vec![EMPTY_MESSAGE.to_string()];
    }
    filtered.matched.iter().map(|i| i.key.clone()).collect()
}
