//! Resolution cache for metadata lookups.
//!
//! Every scanned item's lookup result is remembered so later runs skip the
//! external service. The cache is a single JSON object on disk, keys sorted,
//! so it can be committed and diffed next to the generated config.
//!
//! # Architecture
//!
//! * [`entry`]: the record stored per key and its validation on load.
//! * [`store`]: loading, saving, and maintenance of the whole file.
//!
//! # Keys
//!
//! Keys combine title, year, and path as `"{title}|{year}|{path}"` (year empty
//! when unknown). Two items with the same title and year but different paths
//! therefore resolve independently.

pub mod entry;
pub mod store;

use std::path::{Path, PathBuf};

pub use entry::{CacheEntry, CollectionRef};
pub use store::{CacheStats, CacheStore};

/// Errors raised by the cache store.
///
/// A malformed cache file is not an error; it is logged and replaced by an
/// empty cache.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// The cache file exists but could not be read.
    #[error("Failed to read cache {path}: {source}")]
    Read {
        /// Cache path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The cache could not be written to its destination.
    #[error("Failed to write cache {path}: {source}")]
    Write {
        /// Cache path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The cache could not be serialized.
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Build the cache key for a (title, year, path) triple.
///
/// # Examples
///
/// ```
/// use franchise_builder::cache::cache_key;
/// use std::path::Path;
///
/// assert_eq!(
///     cache_key("Toy Story", Some(1995), Path::new("/media/movies/Toy Story (1995)")),
///     "Toy Story|1995|/media/movies/Toy Story (1995)"
/// );
/// assert_eq!(cache_key("Heat", None, Path::new("/m/Heat")), "Heat||/m/Heat");
/// ```
#[must_use]
pub fn cache_key(title: &str, year: Option<u16>, path: &Path) -> String {
    let year = year.map(|y| y.to_string()).unwrap_or_default();
    format!("{}|{}|{}", title, year, path.display())
}
