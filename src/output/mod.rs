//! Output formatters for grouped collections.
//!
//! - [`kometa`]: YAML collection file for Kometa (the default)
//! - [`json`]: machine-readable document with a run summary
//!
//! Both render to a `String`; [`write_output`] puts it on disk.
//!
//! # Example
//!
//! ```
//! use franchise_builder::collections::Collection;
//! use franchise_builder::output::kometa::KometaOutput;
//!
//! let collections = vec![Collection {
//!     name: "Toy Story Collection".to_string(),
//!     members: vec!["Toy Story".to_string(), "Toy Story 2".to_string()],
//! }];
//! let yaml = KometaOutput::new(&collections).render();
//! assert!(yaml.starts_with("collections:\n"));
//! ```

pub mod json;
pub mod kometa;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use json::JsonOutput;
pub use kometa::KometaOutput;

/// Format of the collection file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Kometa collection YAML
    #[default]
    Kometa,
    /// JSON document with a summary
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Kometa => write!(f, "kometa"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Errors that can occur while producing the output file.
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The preamble file could not be read
    #[error("Failed to read preamble {path}: {source}")]
    Preamble {
        /// Preamble path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written
    #[error("Failed to write output {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Read a static preamble to place before the generated collections.
///
/// # Errors
///
/// Returns [`OutputError::Preamble`] if the file cannot be read.
pub fn read_preamble(path: &Path) -> Result<String, OutputError> {
    fs::read_to_string(path).map_err(|source| OutputError::Preamble {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `contents` to `path`, creating parent directories.
///
/// The file is written to a temporary sibling and renamed into place so a
/// failed run never leaves a truncated collection file behind.
///
/// # Errors
///
/// Returns [`OutputError::Write`] on any I/O failure.
pub fn write_output(path: &Path, contents: &str) -> Result<(), OutputError> {
    let wrap = |source: std::io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(wrap)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(wrap)?;
    tmp.write_all(contents.as_bytes()).map_err(wrap)?;
    tmp.flush().map_err(wrap)?;
    tmp.persist(path).map_err(|e| wrap(e.error))?;
    Ok(())
}
