//! CLI definition and dispatch
//!
//! Parses the operation and its flags, validates the combination, loads the
//! configuration, builds the storage client once and runs exactly one
//! operation against it.

use std::path::PathBuf;

use bc_core::{Config, ObjectStore};
use bc_s3::S3Client;
use clap::{Parser, ValueEnum};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod delete_filtered;
mod list;
mod list_filtered;
mod upload;

/// Message printed when the flags do not fit the chosen operation
pub const INVALID_ARGUMENTS: &str = "Invalid arguments.";

/// bucketctl - manage files under b-wing/ in an S3 bucket
///
/// Lists, uploads, filters and deletes objects. Listing, filtering and
/// deletion are confined to keys under the b-wing/ prefix.
#[derive(Parser, Debug)]
#[command(name = "bucketctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Type of operation to perform
    #[arg(value_enum)]
    pub operation: Operation,

    /// S3 bucket name
    #[arg(long)]
    pub bucket: String,

    /// Path to the local file (for upload)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Target key in the bucket (for upload)
    #[arg(long)]
    pub target: Option<String>,

    /// Regular expression for filtering keys
    #[arg(long, allow_hyphen_values = true)]
    pub filter: Option<String>,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, env = "BUCKETCTL_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Output format: human-readable or JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

/// Operations the CLI can perform
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// List keys under b-wing/
    List,
    /// Upload a local file to a key
    Upload,
    /// List keys under b-wing/ matching a regex
    ListFiltered,
    /// Delete keys under b-wing/ matching a regex
    DeleteFiltered,
}

/// A validated operation with the arguments it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List {
        bucket: String,
    },
    Upload {
        bucket: String,
        file: PathBuf,
        target: String,
    },
    ListFiltered {
        bucket: String,
        filter: String,
    },
    DeleteFiltered {
        bucket: String,
        filter: String,
    },
}

impl Request {
    /// Validate the flags for the chosen operation
    ///
    /// Returns None when a flag the operation needs is missing or empty.
    /// Flags the operation does not use are ignored.
    pub fn from_cli(cli: &Cli) -> Option<Self> {
        let bucket = non_empty(Some(cli.bucket.as_str()))?.to_string();

        match cli.operation {
            Operation::List => Some(Self::List { bucket }),
            Operation::Upload => {
                let file = cli.file.clone().filter(|f| !f.as_os_str().is_empty())?;
                let target = non_empty(cli.target.as_deref())?.to_string();
                Some(Self::Upload {
                    bucket,
                    file,
                    target,
                })
            }
            Operation::ListFiltered => {
                let filter = non_empty(cli.filter.as_deref())?.to_string();
                Some(Self::ListFiltered { bucket, filter })
            }
            Operation::DeleteFiltered => {
                let filter = non_empty(cli.filter.as_deref())?.to_string();
                Some(Self::DeleteFiltered { bucket, filter })
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Execute the CLI invocation and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    });

    let Some(request) = Request::from_cli(&cli) else {
        formatter.error(INVALID_ARGUMENTS);
        return ExitCode::UsageError;
    };
    tracing::debug!(?request, "Validated request");

    let config = match Config::load(cli.env_file.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    formatter.lines(&startup_summary(&config, &formatter));

    let client = match S3Client::new(&config).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    run(&client, &request, &formatter).await
}

/// Lines of the configuration summary printed before the operation
///
/// Empty in JSON and quiet modes so stdout carries only the result.
fn startup_summary(config: &Config, formatter: &Formatter) -> Vec<String> {
    if formatter.is_json() || formatter.is_quiet() {
        return Vec::new();
    }
    config.summary()
}

/// Run one validated request against a store
pub async fn run(store: &dyn ObjectStore, request: &Request, formatter: &Formatter) -> ExitCode {
    match request {
        Request::List { bucket } => list::execute(store, bucket, formatter).await,
        Request::Upload {
            bucket,
            file,
            target,
        } => upload::execute(store, bucket, file, target, formatter).await,
        Request::ListFiltered { bucket, filter } => {
            list_filtered::execute(store, bucket, filter, formatter).await
        }
        Request::DeleteFiltered { bucket, filter } => {
            delete_filtered::execute(store, bucket, filter, formatter).await
        }
    }
}
