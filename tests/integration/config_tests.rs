use std::fs;
use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use franchise_builder::config::Config;
use franchise_builder::output::OutputFormat;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config = Config::from_figment(&figment).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
scan_roots = ["/media/movies", "/media/kids"]
ignore_patterns = ["Extras/"]
min_items = 3
checkpoint_every = 25
output_format = "json"

[curated_collections]
"Hocus Pocus Collection" = ["Hocus Pocus"]
"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(
        config.scan_roots,
        vec![PathBuf::from("/media/movies"), PathBuf::from("/media/kids")]
    );
    assert_eq!(config.ignore_patterns, vec!["Extras/"]);
    assert_eq!(config.min_items, 3);
    assert_eq!(config.checkpoint_every, 25);
    assert_eq!(config.output_format, OutputFormat::Json);
    assert_eq!(
        config.curated_collections["Hocus Pocus Collection"],
        vec!["Hocus Pocus"]
    );
}

#[test]
fn test_config_env_overrides_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "min_items = 3\nrequest_timeout_secs = 5\n").unwrap();

    std::env::set_var("FBTEST_MIN_ITEMS", "4");
    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .merge(Env::prefixed("FBTEST_").split("__"));
    let config = Config::from_figment(&figment).unwrap();
    std::env::remove_var("FBTEST_MIN_ITEMS");

    assert_eq!(config.min_items, 4);
    assert_eq!(config.request_timeout_secs, 5);
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let temp_dir = tempdir().unwrap();
    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(temp_dir.path().join("absent.toml")));
    let config = Config::from_figment(&figment).unwrap();
    assert_eq!(config.min_items, 2);
}

#[test]
fn test_config_rejects_out_of_range() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "request_timeout_secs = 0\n").unwrap();

    let err = Config::load(Some(&config_path)).unwrap_err();
    assert!(err.to_string().contains("request_timeout_secs"));
}

#[test]
fn test_config_show_round_trips() {
    let config = Config {
        scan_roots: vec![PathBuf::from("/media/movies")],
        negative_ttl_days: Some(14),
        ..Config::default()
    };
    let rendered = config.to_toml_string().unwrap();

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::string(&rendered));
    let reparsed = Config::from_figment(&figment).unwrap();
    assert_eq!(reparsed, config);
}
