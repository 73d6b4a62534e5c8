//! Shared fixtures: a stub metadata service and a temporary library.

use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use franchise_builder::cache::CollectionRef;
use franchise_builder::metadata::{MetadataService, MovieDetails, SearchHit, ServiceError};
use tempfile::TempDir;

/// In-memory movie database that counts the requests it receives.
#[derive(Default)]
pub struct StubService {
    ids: HashMap<String, u64>,
    details: HashMap<u64, MovieDetails>,
    failing: Vec<String>,
    pub searches: Cell<usize>,
    pub detail_calls: Cell<usize>,
}

impl StubService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a movie found by searching `title`.
    pub fn movie(mut self, title: &str, id: u64, collection: Option<(u64, &str)>) -> Self {
        self.ids.insert(title.to_string(), id);
        self.details.insert(
            id,
            MovieDetails {
                title: Some(title.to_string()),
                collection: collection.map(|(cid, name)| CollectionRef::new(cid, name)),
            },
        );
        self
    }

    /// Searches for `title` fail with a transport error.
    pub fn failing(mut self, title: &str) -> Self {
        self.failing.push(title.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.searches.get() + self.detail_calls.get()
    }
}

impl MetadataService for StubService {
    fn search(&self, title: &str, _year: Option<u16>) -> Result<Vec<SearchHit>, ServiceError> {
        self.searches.set(self.searches.get() + 1);
        if self.failing.iter().any(|t| t == title) {
            return Err(ServiceError::Transport {
                url: "stub://search/movie".to_string(),
                message: "connection reset".to_string(),
            });
        }
        Ok(self
            .ids
            .get(title)
            .map(|&id| vec![SearchHit { id }])
            .unwrap_or_default())
    }

    fn details(&self, id: u64) -> Result<MovieDetails, ServiceError> {
        self.detail_calls.set(self.detail_calls.get() + 1);
        Ok(self.details.get(&id).cloned().unwrap_or_default())
    }
}

/// Service knowing the three Toy Story films.
pub fn toy_story_service() -> StubService {
    let collection = Some((10194, "Toy Story Collection"));
    StubService::new()
        .movie("Toy Story", 862, collection)
        .movie("Toy Story 2", 863, collection)
        .movie("Toy Story 3", 10193, collection)
}

/// Create one folder per name under `root`.
pub fn make_folders(root: &Path, names: &[&str]) {
    for name in names {
        fs::create_dir_all(root.join(name)).unwrap();
    }
}

/// A library with the three Toy Story folders.
pub fn toy_story_library() -> TempDir {
    let dir = TempDir::new().unwrap();
    make_folders(
        dir.path(),
        &[
            "Toy Story (1995)",
            "Toy Story 2 (1999) 1080p",
            "Toy Story 3 (2010) BluRay",
        ],
    );
    dir
}
