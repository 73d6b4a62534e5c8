//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the application.
///
/// - 0: Success (collections were written)
/// - 1: General error (unexpected failure)
/// - 2: No collections (completed normally, nothing met the size filter)
/// - 3: Partial success (some lookups failed and were skipped)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: collections were written.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// No collections: the run completed but nothing was emitted.
    NoCollections = 2,
    /// Partial success: the run completed but some lookups failed.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FB000",
            Self::GeneralError => "FB001",
            Self::NoCollections => "FB002",
            Self::PartialSuccess => "FB003",
        }
    }

    /// Exit code for a completed build.
    ///
    /// Transient failures take precedence over an empty result: a rerun may
    /// well produce collections.
    #[must_use]
    pub fn for_build(collections_emitted: usize, transient_failures: usize) -> Self {
        if transient_failures > 0 {
            Self::PartialSuccess
        } else if collections_emitted == 0 {
            Self::NoCollections
        } else {
            Self::Success
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "FB001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Underlying causes, outermost first
    pub causes: Vec<String>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            causes: err.chain().skip(1).map(ToString::to_string).collect(),
        }
    }
}
