//! Cache-backed resolution of scanned titles.
//!
//! # Flow
//!
//! 1. Look up the `(title, year, path)` key in the cache. A positive entry
//!    that already carries the canonical title is answered without any
//!    external call. A negative entry is answered as [`Resolution::LookupMiss`]
//!    unless a negative TTL is configured and the entry is older than it.
//! 2. Without a cached id, search by title and year and take the first
//!    candidate. No ranking is attempted.
//! 3. With an id, fetch the detail record for the canonical title and the
//!    parent collection.
//! 4. Write the result back to the cache, negative results included.
//!
//! Service failures produce [`Resolution::TransientError`] and leave the cache
//! untouched, so a network blip never turns into a cached "not found".
//!
//! Cached misses are not searched again by default: a title that appears on
//! the service later stays missing until a negative TTL is set
//! ([`Resolver::with_negative_ttl`]) or `cache prune` clears it.

use std::path::Path;

use chrono::{Duration, Utc};

use super::{MetadataService, ServiceError};
use crate::cache::{cache_key, CacheEntry, CacheStore, CollectionRef};

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    /// External identifier
    pub external_id: u64,
    /// Title reported by the service, or the parsed title if it had none
    pub canonical_title: String,
    /// Parent collection, if any
    pub collection: Option<CollectionRef>,
}

/// Outcome of resolving one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The service knows this title.
    Resolved(ResolvedTitle),
    /// The search returned no candidate. Not an error.
    LookupMiss,
    /// The service could not be reached or answered garbage. The item should
    /// be skipped for this run; nothing was cached.
    TransientError(String),
}

impl Resolution {
    /// Title to display: the canonical title when resolved, else `fallback`.
    #[must_use]
    pub fn display_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            Self::Resolved(resolved) => &resolved.canonical_title,
            Self::LookupMiss | Self::TransientError(_) => fallback,
        }
    }

    /// Parent collection, when resolved into one.
    #[must_use]
    pub fn collection(&self) -> Option<&CollectionRef> {
        match self {
            Self::Resolved(resolved) => resolved.collection.as_ref(),
            Self::LookupMiss | Self::TransientError(_) => None,
        }
    }
}

/// Counters for the end-of-run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Items answered entirely from the cache
    pub cache_hits: usize,
    /// Search requests sent
    pub searches: usize,
    /// Detail requests sent
    pub detail_fetches: usize,
    /// Items resolved to an id
    pub resolved: usize,
    /// Items with no id
    pub misses: usize,
    /// Items skipped because of a service failure
    pub transient_failures: usize,
}

impl ResolverStats {
    /// Total requests sent to the service.
    #[must_use]
    pub fn external_calls(&self) -> usize {
        self.searches + self.detail_fetches
    }
}

/// Resolves titles through a [`MetadataService`], remembering results in a
/// [`CacheStore`].
#[derive(Debug)]
pub struct Resolver<S> {
    service: S,
    cache: CacheStore,
    negative_ttl: Option<Duration>,
    stats: ResolverStats,
}

impl<S: MetadataService> Resolver<S> {
    /// Create a resolver. Negative cache entries never expire.
    #[must_use]
    pub fn new(service: S, cache: CacheStore) -> Self {
        Self {
            service,
            cache,
            negative_ttl: None,
            stats: ResolverStats::default(),
        }
    }

    /// Re-search negative cache entries older than `ttl`.
    #[must_use]
    pub fn with_negative_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.negative_ttl = ttl;
        self
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    /// The underlying cache.
    #[must_use]
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Mutable access to the cache, for checkpoint saves.
    pub fn cache_mut(&mut self) -> &mut CacheStore {
        &mut self.cache
    }

    /// Consume the resolver, returning the cache.
    #[must_use]
    pub fn into_cache(self) -> CacheStore {
        self.cache
    }

    fn negative_still_valid(&self, entry: &CacheEntry) -> bool {
        match self.negative_ttl {
            None => true,
            Some(ttl) => !entry.is_expired_negative(ttl, Utc::now()),
        }
    }

    fn transient(&mut self, title: &str, error: &ServiceError) -> Resolution {
        self.stats.transient_failures += 1;
        log::warn!("Lookup for '{}' failed, skipping: {}", title, error);
        Resolution::TransientError(error.to_string())
    }

    /// Resolve one item.
    ///
    /// # Arguments
    ///
    /// * `title` - Parsed title
    /// * `year` - Parsed release year
    /// * `path` - Where the item was found; part of the cache key
    pub fn resolve(&mut self, title: &str, year: Option<u16>, path: &Path) -> Resolution {
        let key = cache_key(title, year, path);
        let cached = self.cache.get(&key).cloned();

        if let Some(entry) = &cached {
            match (entry.external_id, &entry.title) {
                (Some(id), Some(canonical)) => {
                    log::trace!("Cache hit for '{}': {}", key, id);
                    self.stats.cache_hits += 1;
                    self.stats.resolved += 1;
                    return Resolution::Resolved(ResolvedTitle {
                        external_id: id,
                        canonical_title: canonical.clone(),
                        collection: entry.collection.clone(),
                    });
                }
                (None, _) if self.negative_still_valid(entry) => {
                    log::trace!("Cached miss for '{}'", key);
                    self.stats.cache_hits += 1;
                    self.stats.misses += 1;
                    return Resolution::LookupMiss;
                }
                _ => {}
            }
        }

        let id = match cached.and_then(|e| e.external_id) {
            Some(id) => Some(id),
            None => {
                self.stats.searches += 1;
                match self.service.search(title, year) {
                    Ok(hits) => hits.first().map(|hit| hit.id).filter(|id| *id != 0),
                    Err(error) => return self.transient(title, &error),
                }
            }
        };

        let Some(id) = id else {
            log::debug!("No match for '{}' ({:?})", title, year);
            self.cache.insert(key, CacheEntry::miss());
            self.stats.misses += 1;
            return Resolution::LookupMiss;
        };

        self.stats.detail_fetches += 1;
        let details = match self.service.details(id) {
            Ok(details) => details,
            Err(error) => return self.transient(title, &error),
        };

        let canonical_title = details.title.unwrap_or_else(|| title.to_string());
        log::debug!(
            "Resolved '{}' → {} '{}'{}",
            title,
            id,
            canonical_title,
            details
                .collection
                .as_ref()
                .map(|c| format!(" in '{}'", c.name))
                .unwrap_or_default()
        );

        self.cache.insert(
            key,
            CacheEntry::resolved(id, Some(canonical_title.clone()), details.collection.clone()),
        );
        self.stats.resolved += 1;

        Resolution::Resolved(ResolvedTitle {
            external_id: id,
            canonical_title,
            collection: details.collection,
        })
    }
}
