//! Exit code definitions for bucketctl
//!
//! Every failed operation maps to a non-zero code so scripts can tell a
//! failed run from a successful one.

use bc_core::Error;

/// Exit codes for the bucketctl application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General/unspecified error, including partially failed deletes
    GeneralError = 1,

    /// User input error: invalid arguments, bad filter pattern, bad config
    UsageError = 2,

    /// Network or provider error
    NetworkError = 3,

    /// Authentication or permission failure
    AuthError = 4,

    /// Bucket, object or local file not found
    NotFound = 5,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            5 => Some(Self::NotFound),
            _ => None,
        }
    }

    /// Exit code for a failed operation
    pub fn from_error(error: &Error) -> Self {
        Self::from_i32(error.exit_code()).unwrap_or(Self::GeneralError)
    }
}
