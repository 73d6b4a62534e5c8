//! Media inventory: what is on disk, as parsed titles.
//!
//! # Architecture
//!
//! * [`walker`]: traversal of one library root with jwalk.
//! * [`scan_roots`]: walks every configured root and collects the items,
//!   skipping roots that do not exist.
//!
//! Every directory yields an item from its name and every video file yields
//! an item from its stem, so both `Movies/Heat (1995)/` and
//! `Movies/Heat (1995).mkv` layouts are picked up. Duplicates across layouts
//! are harmless: collection membership is a set.

pub mod walker;

use std::path::{Path, PathBuf};

pub use walker::Walker;

use crate::title::parse_title_year;

/// File extensions recognised as video files.
pub const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "mov", "m4v"];

/// One scanned title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Title with year and quality tags removed
    pub title: String,
    /// Release year from a trailing `(YYYY)`
    pub year: Option<u16>,
    /// Directory or file the title was read from
    pub path: PathBuf,
}

impl MediaItem {
    /// Create an item from already-parsed parts.
    #[must_use]
    pub fn new(title: impl Into<String>, year: Option<u16>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            year,
            path: path.into(),
        }
    }

    /// Parse a raw folder or file name.
    ///
    /// Returns `None` when nothing is left of the title after parsing (a
    /// folder named `"(1999)"` or `"1080p"`).
    #[must_use]
    pub fn from_name(name: &str, path: &Path) -> Option<Self> {
        let (title, year) = parse_title_year(name);
        if title.is_empty() {
            return None;
        }
        Some(Self::new(title, year, path))
    }
}

/// Configuration for the inventory scan.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Gitignore-style patterns excluding entries (and, for directories,
    /// everything below them).
    pub ignore_patterns: Vec<String>,
    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,
}

/// Errors that can occur during the scan.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The root does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred below a root.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result of scanning several roots.
#[derive(Debug, Default)]
pub struct Inventory {
    /// Every parsed item, in walk order
    pub items: Vec<MediaItem>,
    /// Non-fatal problems met along the way
    pub errors: Vec<ScanError>,
}

/// Walk every root and collect the inventory.
///
/// Missing roots and unreadable entries are logged and recorded in
/// [`Inventory::errors`]; they never abort the scan.
#[must_use]
pub fn scan_roots(roots: &[PathBuf], config: &ScanConfig) -> Inventory {
    let mut inventory = Inventory::default();

    for root in roots {
        if !root.exists() {
            log::warn!("Scan root does not exist, skipping: {}", root.display());
            inventory.errors.push(ScanError::NotFound(root.clone()));
            continue;
        }
        if !root.is_dir() {
            log::warn!("Scan root is not a directory, skipping: {}", root.display());
            inventory.errors.push(ScanError::NotADirectory(root.clone()));
            continue;
        }

        let before = inventory.items.len();
        for result in Walker::new(root, config.clone()).walk() {
            match result {
                Ok(item) => inventory.items.push(item),
                Err(e) => inventory.errors.push(e),
            }
        }
        log::info!(
            "Scanned {}: {} items",
            root.display(),
            inventory.items.len() - before
        );
    }

    inventory
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_from_name_parses() {
        let item = MediaItem::from_name("Heat (1995) 1080p", Path::new("/m/Heat (1995) 1080p")).unwrap();
        assert_eq!(item.title, "Heat");
        assert_eq!(item.year, Some(1995));
        assert_eq!(item.path, PathBuf::from("/m/Heat (1995) 1080p"));
    }

    #[test]
    fn test_from_name_empty_title() {
        assert!(MediaItem::from_name("(1999)", Path::new("/m/(1999)")).is_none());
        assert!(MediaItem::from_name("1080p", Path::new("/m/1080p")).is_none());
    }

    #[test]
    fn test_scan_roots_skips_missing() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Heat (1995)")).unwrap();

        let roots = vec![dir.path().join("missing"), dir.path().to_path_buf()];
        let inventory = scan_roots(&roots, &ScanConfig::default());

        assert_eq!(inventory.items.len(), 1);
        assert_eq!(inventory.errors.len(), 1);
        assert!(matches!(inventory.errors[0], ScanError::NotFound(_)));
    }

    #[test]
    fn test_scan_roots_rejects_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("movie.mkv");
        fs::write(&file, b"x").unwrap();

        let inventory = scan_roots(&[file], &ScanConfig::default());
        assert!(inventory.items.is_empty());
        assert!(matches!(inventory.errors[0], ScanError::NotADirectory(_)));
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::NotFound(PathBuf::from("/media/movies"));
        assert_eq!(err.to_string(), "Path not found: /media/movies");
    }
}
