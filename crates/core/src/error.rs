//! Error types for bc-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for bc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bc-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration or env file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Endpoint URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Filter pattern failed to compile
    #[error("Invalid filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication or permission error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Bucket, object or local file not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or provider error
    #[error("Network error: {0}")]
    Network(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::InvalidPattern(_) => 2,                // UsageError
            Error::Network(_) => 3,                       // NetworkError
            Error::Auth(_) => 4,                          // AuthError
            Error::NotFound(_) => 5,                      // NotFound
            Error::Io(_) => 1,                            // GeneralError
        }
    }
}
