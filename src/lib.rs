//! franchise-builder: group a local movie library into franchise collections.
//!
//! The library is scanned for titles, each title is resolved through TMDB
//! (behind a persistent JSON cache) to its parent collection, curated
//! fallback collections are matched by title pattern, and the result is
//! written as a Kometa collection file.
//!
//! # Modules
//!
//! * [`title`]: folder-name canonicalization and sequel-insensitive keys
//! * [`inventory`]: library traversal
//! * [`cache`]: the lookup cache file
//! * [`metadata`]: the TMDB client and the cache-backed resolver
//! * [`collections`]: grouping and curated collections
//! * [`output`]: Kometa YAML and JSON renderers
//! * [`pipeline`]: the whole build, end to end

pub mod cache;
pub mod cli;
pub mod collections;
pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod title;

use std::time::Duration;

use anyhow::{Context, Result};

use crate::cache::CacheStore;
use crate::cli::{CacheCommand, Cli, Commands, ConfigCommand};
use crate::config::Config;
use crate::error::ExitCode;
use crate::metadata::TmdbClient;
use crate::progress::Progress;

/// Run the command described by `cli`.
///
/// # Errors
///
/// Returns an error for invalid configuration, a missing API key, and cache
/// or output failures. Lookup failures only affect the exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build(args) => {
            args.apply_to(&mut config);
            config.validate()?;
            run_build_command(&config, cli.quiet)
        }
        Commands::Cache(args) => {
            if let Some(path) = args.cache {
                config.cache_path = path;
            }
            run_cache_command(&config, &args.command)
        }
        Commands::Config(args) => match args.command {
            ConfigCommand::Show => {
                print!("{}", config.to_toml_string()?);
                Ok(ExitCode::Success)
            }
        },
    }
}

fn run_build_command(config: &Config, quiet: bool) -> Result<ExitCode> {
    let api_key = config
        .tmdb_api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .context("No TMDB API key: pass --api-key or set TMDB_API_KEY")?;
    if config.scan_roots.is_empty() {
        anyhow::bail!("No library roots to scan: pass paths or set scan_roots");
    }

    let client = TmdbClient::new(
        api_key,
        config.tmdb_base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    );
    let progress = Progress::new(quiet);
    let outcome = pipeline::run_build(config, client, &progress)?;

    if !quiet {
        println!("{}", outcome.summary.report());
    }

    let code = outcome.summary.exit_code();
    if code == ExitCode::PartialSuccess {
        log::warn!(
            "{} lookup(s) failed and were skipped; rerun to retry them",
            outcome.summary.resolver.transient_failures
        );
    }
    Ok(code)
}

fn run_cache_command(config: &Config, command: &CacheCommand) -> Result<ExitCode> {
    let mut cache = CacheStore::load(&config.cache_path)
        .with_context(|| format!("Failed to open cache {}", config.cache_path.display()))?;

    match command {
        CacheCommand::Stats => {
            let stats = cache.stats();
            println!("Cache:           {}", cache.path().display());
            println!("Entries:         {}", stats.entries);
            println!("Found:           {}", stats.positive);
            println!("Not found:       {}", stats.negative);
            println!("In a collection: {}", stats.with_collection);
        }
        CacheCommand::Prune => {
            let removed = cache.prune_negative();
            if cache.is_dirty() {
                cache.save()?;
            }
            println!(
                "Removed {} cached miss(es); {} entries left",
                removed,
                cache.len()
            );
        }
    }
    Ok(ExitCode::Success)
}
