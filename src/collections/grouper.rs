//! Grouping resolved titles into collections.
//!
//! Two independent sources feed the grouper:
//!
//! - the parent collection reported by the metadata service, keyed by the
//!   collection name with the canonical title as member;
//! - the curated table, matched against the parsed titles of the whole
//!   inventory.
//!
//! A curated collection contributes only when it matched at least two
//! titles. When both sources produce the same name their member sets are
//! merged. Collections smaller than `min_items` are dropped at the end.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::curated::CuratedCollections;
use crate::inventory::MediaItem;
use crate::metadata::Resolution;

/// Minimum number of matched titles for a curated collection to count.
pub const CURATED_MIN_HITS: usize = 2;

/// One emitted collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    /// Collection name
    pub name: String,
    /// Member titles, sorted and distinct
    pub members: Vec<String>,
}

/// Counters describing one grouping pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    /// Distinct collections before the size filter
    pub candidates: usize,
    /// Collections reported by the metadata service
    pub from_service: usize,
    /// Curated collections with enough hits
    pub from_curated: usize,
    /// Collections dropped by the size filter
    pub below_minimum: usize,
}

/// Result of [`CollectionGrouper::finish`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedCollections {
    /// Collections in output order
    pub collections: Vec<Collection>,
    /// Counters for the summary
    pub stats: GroupingStats,
}

impl GroupedCollections {
    /// Number of emitted collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether nothing survived the size filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

/// Accumulates membership while items are resolved.
#[derive(Debug, Default)]
pub struct CollectionGrouper {
    resolved: BTreeMap<String, BTreeSet<String>>,
    inventory_titles: BTreeSet<String>,
}

impl CollectionGrouper {
    /// Create an empty grouper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a parsed title for curated matching.
    pub fn add_inventory_title(&mut self, title: &str) {
        if !title.is_empty() {
            self.inventory_titles.insert(title.to_string());
        }
    }

    /// Add `canonical` to the service-reported collection `name`.
    pub fn add_resolved(&mut self, name: &str, canonical: &str) {
        if name.trim().is_empty() || canonical.is_empty() {
            return;
        }
        self.resolved
            .entry(name.to_string())
            .or_default()
            .insert(canonical.to_string());
    }

    /// Record one item and its resolution outcome.
    ///
    /// Every item counts for curated matching. Only resolved items with a
    /// parent collection join a service collection.
    pub fn record(&mut self, item: &MediaItem, resolution: &Resolution) {
        self.add_inventory_title(&item.title);
        if let (Resolution::Resolved(resolved), Some(collection)) =
            (resolution, resolution.collection())
        {
            self.add_resolved(&collection.name, &resolved.canonical_title);
        }
    }

    /// Merge both sources, apply the size filter and sort.
    ///
    /// Collections are ordered by lowercase name with the exact name as tie
    /// breaker; members are in plain lexicographic order.
    #[must_use]
    pub fn finish(self, curated: &CuratedCollections, min_items: usize) -> GroupedCollections {
        let mut stats = GroupingStats {
            from_service: self.resolved.len(),
            ..GroupingStats::default()
        };
        let mut merged = self.resolved;

        for (name, hits) in curated.match_titles(&self.inventory_titles) {
            if hits.len() < CURATED_MIN_HITS {
                log::debug!("Curated '{}' matched {} title(s), skipped", name, hits.len());
                continue;
            }
            stats.from_curated += 1;
            merged.entry(name).or_default().extend(hits);
        }
        stats.candidates = merged.len();

        let mut collections: Vec<Collection> = merged
            .into_iter()
            .filter(|(name, members)| {
                let keep = members.len() >= min_items;
                if !keep {
                    log::trace!("Dropping '{}' with {} member(s)", name, members.len());
                }
                keep
            })
            .map(|(name, members)| Collection {
                name,
                members: members.into_iter().collect(),
            })
            .collect();
        stats.below_minimum = stats.candidates - collections.len();

        collections.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        GroupedCollections { collections, stats }
    }
}
