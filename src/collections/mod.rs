//! Franchise collections.
//!
//! * [`curated`]: configured fallback collections matched by title pattern
//! * [`grouper`]: merges service-reported and curated membership

pub mod curated;
pub mod grouper;

pub use curated::CuratedCollections;
pub use grouper::{Collection, CollectionGrouper, GroupedCollections, GroupingStats};
