//! Cache record definitions and per-record validation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parent collection reported by the metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionRef {
    /// External collection identifier
    pub id: u64,
    /// Display name, e.g. "Toy Story Collection"
    pub name: String,
}

impl CollectionRef {
    /// Create a collection reference.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One cached resolution.
///
/// An entry without `external_id` is a negative result: the search returned
/// nothing for that title and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// External identifier, if the search found one
    #[serde(default, alias = "tmdb_id")]
    pub external_id: Option<u64>,
    /// Canonical title from the detail record
    #[serde(default)]
    pub title: Option<String>,
    /// Parent collection from the detail record
    #[serde(default)]
    pub collection: Option<CollectionRef>,
    /// When the entry was written
    #[serde(default)]
    pub cached_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// A positive entry stamped with the current time.
    #[must_use]
    pub fn resolved(
        external_id: u64,
        title: Option<String>,
        collection: Option<CollectionRef>,
    ) -> Self {
        Self {
            external_id: Some(external_id),
            title,
            collection,
            cached_at: Some(Utc::now()),
        }
    }

    /// A negative entry stamped with the current time.
    #[must_use]
    pub fn miss() -> Self {
        Self {
            external_id: None,
            title: None,
            collection: None,
            cached_at: Some(Utc::now()),
        }
    }

    /// Whether the entry records a failed search.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.external_id.is_none()
    }

    /// Whether a negative entry is older than `ttl`.
    ///
    /// Entries without a timestamp count as expired. Positive entries never
    /// expire.
    #[must_use]
    pub fn is_expired_negative(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        if !self.is_negative() {
            return false;
        }
        self.cached_at.is_none_or(|at| now - at > ttl)
    }

    /// Validate a raw JSON record.
    ///
    /// Returns `None` when the record is not an object or a present field has
    /// the wrong shape (for example a collection without a name). A zero id is
    /// treated as absent.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let mut entry: Self = serde_json::from_value(value).ok()?;
        if entry.external_id == Some(0) {
            entry.external_id = None;
        }
        if entry.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            entry.title = None;
        }
        Some(entry)
    }
}
