//! Output formatter for human-readable and JSON output
//!
//! Results go to stdout; errors and warnings go to stderr.

use console::style;
use serde::Serialize;

use super::OutputConfig;

/// Formatter for CLI output
///
/// When JSON mode is enabled, stdout carries strict JSON without colors.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        if config.no_color || config.json {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        Self { config }
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({
                "error": message
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
            );
        } else {
            eprintln!("{} {message}", style("✗").red().for_stderr());
        }
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        eprintln!("{} {message}", style("⚠").yellow().for_stderr());
    }

    /// Output JSON directly
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Print a line of text (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        println!("{message}");
    }

    /// Print several lines of text (respects quiet mode)
    pub fn lines<S: AsRef<str>>(&self, lines: &[S]) {
        for line in lines {
            self.println(line.as_ref());
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
