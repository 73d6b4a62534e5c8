use std::fs;
use std::path::Path;

use franchise_builder::cache::{cache_key, CacheEntry, CacheStore, CollectionRef};
use franchise_builder::metadata::{Resolution, Resolver};
use tempfile::tempdir;

use super::support::toy_story_service;

#[test]
fn test_cache_file_is_sorted_pretty_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tmdb_cache.json");

    let mut store = CacheStore::empty(&path);
    store.insert("b|1999|/m/b".to_string(), CacheEntry::miss());
    store.insert(
        "a|1995|/m/a".to_string(),
        CacheEntry::resolved(862, Some("Toy Story".to_string()), None),
    );
    store.save().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n  \"a|1995|/m/a\": {"));
    assert!(text.find("a|1995").unwrap() < text.find("b|1999").unwrap());
}

#[test]
fn test_legacy_records_are_accepted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tmdb_cache.json");
    fs::write(
        &path,
        r#"{
  "Toy Story|1995|/m/Toy Story (1995)": {
    "collection": {"id": 10194, "name": "Toy Story Collection"},
    "tmdb_id": 862
  },
  "Nope||/m/Nope": {"collection": null, "tmdb_id": null}
}"#,
    )
    .unwrap();

    let store = CacheStore::load(&path).unwrap();
    assert_eq!(store.len(), 2);

    let entry = store.get("Toy Story|1995|/m/Toy Story (1995)").unwrap();
    assert_eq!(entry.external_id, Some(862));
    assert_eq!(
        entry.collection,
        Some(CollectionRef::new(10194, "Toy Story Collection"))
    );
    assert!(store.get("Nope||/m/Nope").unwrap().is_negative());
}

#[test]
fn test_legacy_positive_entry_triggers_detail_fetch_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tmdb_cache.json");
    let item_path = Path::new("/m/Toy Story (1995)");
    fs::write(
        &path,
        format!(
            r#"{{"{}": {{"tmdb_id": 862, "collection": null}}}}"#,
            cache_key("Toy Story", Some(1995), item_path)
        ),
    )
    .unwrap();

    let service = toy_story_service();
    let mut resolver = Resolver::new(&service, CacheStore::load(&path).unwrap());
    let resolution = resolver.resolve("Toy Story", Some(1995), item_path);

    assert!(matches!(resolution, Resolution::Resolved(_)));
    assert_eq!(service.searches.get(), 0);
    assert_eq!(service.detail_calls.get(), 1);
}

#[test]
fn test_malformed_cache_is_a_cold_start() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tmdb_cache.json");
    fs::write(&path, "{ not json").unwrap();

    let store = CacheStore::load(&path).unwrap();
    assert!(store.is_empty());

    let service = toy_story_service();
    let mut resolver = Resolver::new(&service, store);
    resolver.resolve("Toy Story", Some(1995), Path::new("/m/ts"));
    resolver.cache_mut().save().unwrap();

    let reloaded = CacheStore::load(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
}

#[test]
fn test_invalid_record_is_dropped_alone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tmdb_cache.json");
    fs::write(
        &path,
        r#"{"good||/a": {"external_id": 1, "title": "Good"}, "bad||/b": "garbage"}"#,
    )
    .unwrap();

    let store = CacheStore::load(&path).unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.get("good||/a").is_some());
    assert!(store.is_dirty());
}

#[test]
fn test_prune_then_stats() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tmdb_cache.json");

    let mut store = CacheStore::empty(&path);
    store.insert("a||/a".to_string(), CacheEntry::miss());
    store.insert(
        "b||/b".to_string(),
        CacheEntry::resolved(
            2,
            Some("B".to_string()),
            Some(CollectionRef::new(7, "B Collection")),
        ),
    );
    store.save().unwrap();

    let mut store = CacheStore::load(&path).unwrap();
    assert_eq!(store.stats().negative, 1);
    assert_eq!(store.prune_negative(), 1);
    store.save().unwrap();

    let stats = CacheStore::load(&path).unwrap().stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.positive, 1);
    assert_eq!(stats.with_collection, 1);
}
