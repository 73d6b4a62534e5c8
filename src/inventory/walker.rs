//! Library walker using jwalk for parallel traversal.
//!
//! # Features
//!
//! - Parallel directory reading, children sorted for deterministic output
//! - Hidden entries (names starting with `.`) skipped
//! - Gitignore-style exclusion; an excluded directory is not descended into
//! - Directories yield an item from their name, video files from their stem
//!
//! # Example
//!
//! ```no_run
//! use franchise_builder::inventory::{ScanConfig, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/media/movies"), ScanConfig::default());
//! for item in walker.walk().filter_map(Result::ok) {
//!     println!("{} ({:?})", item.title, item.year);
//! }
//! ```

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::WalkDir;

use super::{MediaItem, ScanConfig, ScanError, VIDEO_EXTENSIONS};

/// Walker over one library root.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Scan configuration
    config: ScanConfig,
}

/// Whether `path` matches the ignore patterns, relative to `root`.
fn is_ignored(gitignore: &Gitignore, root: &Path, path: &Path, is_dir: bool) -> bool {
    // Patterns are written with forward slashes even on Windows.
    let relative = path.strip_prefix(root).unwrap_or(path);
    let relative = relative.to_string_lossy();
    let normalized = if cfg!(windows) {
        relative.replace('\\', "/")
    } else {
        relative.into_owned()
    };
    gitignore.matched(normalized, is_dir).is_ignore()
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

impl Walker {
    /// Create a walker for `root`.
    #[must_use]
    pub fn new(root: &Path, config: ScanConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    /// Build the ignore matcher from the configured patterns.
    fn build_gitignore(&self) -> Option<Gitignore> {
        if self.config.ignore_patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if !gitignore.is_empty() => Some(gitignore),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Walk the root, yielding parsed items.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. The root itself is not an item.
    pub fn walk(&self) -> impl Iterator<Item = Result<MediaItem, ScanError>> + '_ {
        let gitignore = self.build_gitignore();
        let filter_root = self.root.clone();

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(true)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                if let Some(gi) = &gitignore {
                    children.retain(|child| match child {
                        Ok(entry) => {
                            let ignored = is_ignored(
                                gi,
                                &filter_root,
                                &entry.path(),
                                entry.file_type().is_dir(),
                            );
                            if ignored {
                                log::trace!("Ignoring: {}", entry.path().display());
                            }
                            !ignored
                        }
                        Err(_) => true,
                    });
                }
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        walk_dir
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    if entry.depth() == 0 {
                        return None;
                    }
                    let path = entry.path();
                    let file_type = entry.file_type();

                    let name = if file_type.is_dir() {
                        entry.file_name().to_string_lossy().into_owned()
                    } else if file_type.is_file() && is_video(&path) {
                        path.file_stem()?.to_string_lossy().into_owned()
                    } else {
                        log::trace!("Skipping non-video entry: {}", path.display());
                        return None;
                    };

                    let item = MediaItem::from_name(&name, &path);
                    if item.is_none() {
                        log::debug!("No title left in '{}', skipping", path.display());
                    }
                    item.map(Ok)
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    Some(Err(ScanError::Io {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    }))
                }
            })
    }
}
