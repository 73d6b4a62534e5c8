use std::collections::{BTreeMap, BTreeSet};

use franchise_builder::cache::CollectionRef;
use franchise_builder::collections::{curated, CollectionGrouper, CuratedCollections};
use franchise_builder::inventory::MediaItem;
use franchise_builder::metadata::{Resolution, ResolvedTitle};

fn titles(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

#[test]
fn test_default_table_matches_known_franchises() {
    let curated = CuratedCollections::new(&curated::default_table());
    let hits = curated.match_titles(&titles(&[
        "Happy Gilmore",
        "Happy Gilmore 2",
        "Joe Dirt",
        "Joe Dirt 2 Beautiful Loser",
        "Spider-Man Into the Spider-Verse",
        "Spider-Man Across the Spider-Verse",
        "One Hundred and One Dalmatians",
        "101 Dalmatians",
        "Heat",
    ]));

    assert_eq!(hits["Happy Gilmore Collection"].len(), 2);
    assert_eq!(hits["Joe Dirt Collection"].len(), 2);
    assert_eq!(hits["Spider-Verse Collection"].len(), 2);
    assert_eq!(hits["101 Dalmatians Collection"].len(), 2);
    assert!(hits["Hocus Pocus Collection"].is_empty());
}

#[test]
fn test_single_hit_curated_collection_is_not_emitted() {
    let mut grouper = CollectionGrouper::new();
    for title in ["Hocus Pocus", "Heat", "Alien"] {
        grouper.record(&MediaItem::new(title, None, title), &Resolution::LookupMiss);
    }

    let grouped = grouper.finish(&CuratedCollections::new(&curated::default_table()), 1);
    assert!(grouped.is_empty());
}

#[test]
fn test_curated_members_are_parsed_titles() {
    let mut grouper = CollectionGrouper::new();
    for (raw, path) in [
        ("Grown Ups (2010) 1080p", "/m/a"),
        ("Grown Ups 2 (2013) x264", "/m/b"),
    ] {
        let item = MediaItem::from_name(raw, std::path::Path::new(path)).unwrap();
        grouper.record(&item, &Resolution::LookupMiss);
    }

    let grouped = grouper.finish(&CuratedCollections::new(&curated::default_table()), 2);
    assert_eq!(grouped.collections[0].name, "Grown Ups Collection");
    assert_eq!(grouped.collections[0].members, vec!["Grown Ups", "Grown Ups 2"]);
}

#[test]
fn test_single_curated_hit_does_not_join_service_collection() {
    let mut grouper = CollectionGrouper::new();
    for (id, title) in [(1, "Grown Ups"), (2, "Grown Ups 2"), (3, "Grown Ups Again")] {
        let resolution = Resolution::Resolved(ResolvedTitle {
            external_id: id,
            canonical_title: title.to_string(),
            collection: Some(CollectionRef::new(99, "Grown Ups Collection")),
        });
        grouper.record(&MediaItem::new(title, None, format!("/m/{id}")), &resolution);
    }
    grouper.record(
        &MediaItem::new("Grown Ups Forever", None, "/m/4"),
        &Resolution::LookupMiss,
    );

    let mut table = BTreeMap::new();
    table.insert(
        "Grown Ups Collection".to_string(),
        vec!["Forever".to_string()],
    );
    let grouped = grouper.finish(&CuratedCollections::new(&table), 2);

    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped.collections[0].name, "Grown Ups Collection");
    assert_eq!(
        grouped.collections[0].members,
        vec!["Grown Ups", "Grown Ups 2", "Grown Ups Again"]
    );
    assert_eq!(grouped.stats.from_curated, 0);
}
