//! JSON output formatter.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "collections": [
//!     { "name": "Toy Story Collection", "members": ["Toy Story", "Toy Story 2"] }
//!   ],
//!   "summary": {
//!     "items_processed": 3,
//!     "resolved": 3,
//!     "misses": 0,
//!     "transient_failures": 0,
//!     "cache_hits": 0,
//!     "external_calls": 6,
//!     "collections_emitted": 1,
//!     "cache_entries": 3,
//!     "scan_errors": 0,
//!     "duration_ms": 812,
//!     "exit_code": 0,
//!     "exit_code_name": "FB000"
//!   }
//! }
//! ```

use serde::Serialize;

use crate::collections::Collection;
use crate::error::ExitCode;
use crate::pipeline::BuildSummary;

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Items found by the scan
    pub items_processed: usize,
    /// Items resolved to an external id
    pub resolved: usize,
    /// Items the service did not know
    pub misses: usize,
    /// Items skipped because of a service failure
    pub transient_failures: usize,
    /// Items answered from the cache alone
    pub cache_hits: usize,
    /// Requests sent to the metadata service
    pub external_calls: usize,
    /// Collections written
    pub collections_emitted: usize,
    /// Entries in the cache after the run
    pub cache_entries: usize,
    /// Non-fatal scan problems
    pub scan_errors: usize,
    /// Wall time of the run in milliseconds
    pub duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "FB000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a [`BuildSummary`] and an exit code.
    #[must_use]
    pub fn from_build_summary(summary: &BuildSummary, exit_code: ExitCode) -> Self {
        Self {
            items_processed: summary.items_processed,
            resolved: summary.resolver.resolved,
            misses: summary.resolver.misses,
            transient_failures: summary.resolver.transient_failures,
            cache_hits: summary.resolver.cache_hits,
            external_calls: summary.resolver.external_calls(),
            collections_emitted: summary.collections_emitted,
            cache_entries: summary.cache_entries,
            scan_errors: summary.scan_errors,
            duration_ms: u64::try_from(summary.duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Collections in output order
    pub collections: &'a [Collection],
    /// Run summary
    pub summary: JsonSummary,
}

impl<'a> JsonOutput<'a> {
    /// Create a new JSON output.
    #[must_use]
    pub fn new(collections: &'a [Collection], summary: &BuildSummary, exit_code: ExitCode) -> Self {
        Self {
            collections,
            summary: JsonSummary::from_build_summary(summary, exit_code),
        }
    }

    /// Serialize to a pretty-printed string with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn render(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
