//! list - List keys under the scope prefix

use bc_core::{Listing, ObjectInfo, ObjectStore, SCOPE_PREFIX, list_files};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Printed when the listing returns nothing
pub const EMPTY_MESSAGE: &str = "No files found in the specified prefix or bucket is empty.";

/// Printed when the provider truncated the listing
pub const TRUNCATED_WARNING: &str =
    "Listing truncated by the provider; only the first page of keys was processed.";

#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    bucket: &'a str,
    prefix: &'a str,
    items: &'a [ObjectInfo],
    truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    continuation_token: Option<&'a str>,
}

impl<'a> ListOutput<'a> {
    fn new(bucket: &'a str, listing: &'a Listing) -> Self {
        Self {
            bucket,
            prefix: SCOPE_PREFIX,
            items: &listing.items,
            truncated: listing.truncated,
            continuation_token: listing.continuation_token.as_deref(),
        }
    }
}

/// Execute the list operation
pub async fn execute(store: &dyn ObjectStore, bucket: &str, formatter: &Formatter) -> ExitCode {
    let listing = match list_files(store, bucket).await {
        Ok(l) => l,
        Err(e) => {
            formatter.error(&format!("Error listing files: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&ListOutput::new(bucket, &listing));
    } else {
        formatter.lines(&render(&listing));
        if listing.truncated {
            formatter.warning(TRUNCATED_WARNING);
        }
    }

    ExitCode::Success
}

/// Human-readable lines for a listing
fn render(listing: &Listing) -> Vec<String> {
    if listing.items.is_empty() {
        return vec![EMPTY_MESSAGE.to_string()];
    }
    listing.items.iter().map(|i| i.key.clone()).collect()
}
