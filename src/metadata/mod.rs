//! External movie metadata lookups.
//!
//! # Architecture
//!
//! * [`MetadataService`]: the two operations the resolver needs, search and
//!   detail. Tests plug in stubs; production uses [`TmdbClient`].
//! * [`tmdb`]: blocking TMDB v3 client.
//! * [`resolver`]: cache-backed resolution of one scanned title.

pub mod resolver;
pub mod tmdb;

pub use resolver::{Resolution, ResolvedTitle, Resolver, ResolverStats};
pub use tmdb::TmdbClient;

use crate::cache::CollectionRef;

/// A search candidate. Only the identifier is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// External identifier
    pub id: u64,
}

/// Detail record for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieDetails {
    /// Canonical title, if the service reports one
    pub title: Option<String>,
    /// Parent collection, if the movie belongs to one
    pub collection: Option<CollectionRef>,
}

/// Failures talking to the metadata service.
///
/// None of these say anything about whether the title exists, so the
/// resolver never caches them.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    /// The request did not complete (DNS, connect, timeout, reset).
    #[error("Request to {url} failed: {message}")]
    Transport {
        /// Requested URL with credentials removed
        url: String,
        /// Transport error description
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("Request to {url} returned HTTP {status}")]
    Status {
        /// Requested URL with credentials removed
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("Invalid response from {url}: {message}")]
    Decode {
        /// Requested URL with credentials removed
        url: String,
        /// Decoder error description
        message: String,
    },
}

/// Search and detail operations against a movie database.
pub trait MetadataService {
    /// Search by title and optional release year, best match first.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] when the request fails.
    fn search(&self, title: &str, year: Option<u16>) -> Result<Vec<SearchHit>, ServiceError>;

    /// Fetch the detail record for an identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] when the request fails.
    fn details(&self, id: u64) -> Result<MovieDetails, ServiceError>;
}

impl<T: MetadataService + ?Sized> MetadataService for &T {
    fn search(&self, title: &str, year: Option<u16>) -> Result<Vec<SearchHit>, ServiceError> {
        (**self).search(title, year)
    }

    fn details(&self, id: u64) -> Result<MovieDetails, ServiceError> {
        (**self).details(id)
    }
}
