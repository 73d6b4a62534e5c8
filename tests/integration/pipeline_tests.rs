use std::collections::BTreeMap;
use std::fs;

use franchise_builder::config::Config;
use franchise_builder::error::ExitCode;
use franchise_builder::output::OutputFormat;
use franchise_builder::pipeline::run_build;
use franchise_builder::progress::NoProgress;
use tempfile::tempdir;

use super::support::{make_folders, toy_story_library, toy_story_service, StubService};

fn config_for(library: &std::path::Path, work: &std::path::Path) -> Config {
    Config {
        scan_roots: vec![library.to_path_buf()],
        cache_path: work.join("cache").join("tmdb_cache.json"),
        output_path: work.join("collections.yml"),
        curated_collections: BTreeMap::new(),
        ..Config::default()
    }
}

#[test]
fn test_toy_story_end_to_end() {
    let library = toy_story_library();
    let work = tempdir().unwrap();
    let config = config_for(library.path(), work.path());
    let service = toy_story_service();

    let outcome = run_build(&config, &service, &NoProgress).unwrap();

    assert_eq!(outcome.collections.len(), 1);
    assert_eq!(outcome.collections[0].name, "Toy Story Collection");
    assert_eq!(
        outcome.collections[0].members,
        vec!["Toy Story", "Toy Story 2", "Toy Story 3"]
    );
    assert_eq!(outcome.summary.items_processed, 3);
    assert_eq!(outcome.summary.resolver.resolved, 3);
    assert_eq!(outcome.summary.exit_code(), ExitCode::Success);

    let yaml = fs::read_to_string(&config.output_path).unwrap();
    assert!(yaml.starts_with("collections:\n  \"Toy Story Collection\":\n"));
    assert!(yaml.contains("          - \"Toy Story 2\"\n"));
    assert!(config.cache_path.exists());
}

#[test]
fn test_second_run_makes_no_external_calls() {
    let library = toy_story_library();
    let work = tempdir().unwrap();
    let config = config_for(library.path(), work.path());

    let first_service = toy_story_service();
    let first = run_build(&config, &first_service, &NoProgress).unwrap();
    assert_eq!(first_service.calls(), 6);
    let first_yaml = fs::read_to_string(&config.output_path).unwrap();

    let second_service = toy_story_service();
    let second = run_build(&config, &second_service, &NoProgress).unwrap();

    assert_eq!(second_service.calls(), 0);
    assert_eq!(second.summary.resolver.cache_hits, 3);
    assert_eq!(first.collections, second.collections);
    assert_eq!(fs::read_to_string(&config.output_path).unwrap(), first_yaml);
}

#[test]
fn test_min_items_one_emits_singletons() {
    let library = tempdir().unwrap();
    make_folders(library.path(), &["Heat (1995)"]);
    let work = tempdir().unwrap();
    let service = StubService::new().movie("Heat", 949, Some((1, "Heat Collection")));

    let mut config = config_for(library.path(), work.path());
    let outcome = run_build(&config, &service, &NoProgress).unwrap();
    assert!(outcome.collections.is_empty());
    assert_eq!(outcome.summary.exit_code(), ExitCode::NoCollections);

    config.min_items = 1;
    let outcome = run_build(&config, &service, &NoProgress).unwrap();
    assert_eq!(outcome.collections.len(), 1);
    assert_eq!(outcome.collections[0].members, vec!["Heat"]);
}

#[test]
fn test_transient_failure_is_skipped_and_not_cached() {
    let library = toy_story_library();
    let work = tempdir().unwrap();
    let config = config_for(library.path(), work.path());
    let service = toy_story_service().failing("Toy Story 3");

    let outcome = run_build(&config, &service, &NoProgress).unwrap();

    assert_eq!(outcome.summary.resolver.transient_failures, 1);
    assert_eq!(outcome.summary.exit_code(), ExitCode::PartialSuccess);
    assert_eq!(
        outcome.collections[0].members,
        vec!["Toy Story", "Toy Story 2"]
    );
    // Only the two successes are remembered; the failure is retried next run.
    assert_eq!(outcome.summary.cache_entries, 2);

    let retry = toy_story_service();
    let outcome = run_build(&config, &retry, &NoProgress).unwrap();
    assert_eq!(retry.searches.get(), 1);
    assert_eq!(outcome.collections[0].members.len(), 3);
}

#[test]
fn test_curated_collection_without_service_collection() {
    let library = tempdir().unwrap();
    make_folders(
        library.path(),
        &[
            "Anchorman The Legend of Ron Burgundy (2004)",
            "Anchorman 2 The Legend Continues (2013)",
            "Heat (1995)",
        ],
    );
    let work = tempdir().unwrap();
    let mut config = config_for(library.path(), work.path());
    config.curated_collections.insert(
        "Anchorman Collection".to_string(),
        vec!["Anchorman".to_string()],
    );

    let outcome = run_build(&config, StubService::new(), &NoProgress).unwrap();

    assert_eq!(outcome.collections.len(), 1);
    assert_eq!(outcome.collections[0].name, "Anchorman Collection");
    assert_eq!(outcome.summary.resolver.misses, 3);
}

#[test]
fn test_missing_root_is_skipped() {
    let library = toy_story_library();
    let work = tempdir().unwrap();
    let mut config = config_for(library.path(), work.path());
    config.scan_roots.insert(0, work.path().join("not-mounted"));

    let outcome = run_build(&config, toy_story_service(), &NoProgress).unwrap();

    assert_eq!(outcome.summary.scan_errors, 1);
    assert_eq!(outcome.collections.len(), 1);
}

#[test]
fn test_json_output_format() {
    let library = toy_story_library();
    let work = tempdir().unwrap();
    let mut config = config_for(library.path(), work.path());
    config.output_format = OutputFormat::Json;
    config.output_path = work.path().join("collections.json");

    run_build(&config, toy_story_service(), &NoProgress).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.output_path).unwrap()).unwrap();
    assert_eq!(value["collections"][0]["name"], "Toy Story Collection");
    assert_eq!(value["summary"]["items_processed"], 3);
    assert_eq!(value["summary"]["exit_code_name"], "FB000");
}

#[test]
fn test_unwritable_output_is_fatal() {
    let library = toy_story_library();
    let work = tempdir().unwrap();
    let blocker = work.path().join("blocker");
    fs::write(&blocker, "x").unwrap();

    let mut config = config_for(library.path(), work.path());
    config.output_path = blocker.join("collections.yml");

    let err = run_build(&config, toy_story_service(), &NoProgress).unwrap_err();
    assert!(err.to_string().contains("Failed to write collections"));
}
