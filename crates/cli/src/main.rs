//! bucketctl - S3 bucket helper
//!
//! Lists, uploads, filters and deletes objects under the b-wing/ prefix of an
//! S3 or S3-compatible bucket.

use bucketctl::commands::{self, Cli};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG applies unless --debug asks for our own debug events
    let filter = if cli.debug {
        EnvFilter::new("bucketctl=debug,bc_core=debug,bc_s3=debug")
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
