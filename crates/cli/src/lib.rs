//! bucketctl CLI library
//!
//! This module exports the CLI components for use by the binary and tests.

pub mod commands;
pub mod exit_code;
pub mod output;
