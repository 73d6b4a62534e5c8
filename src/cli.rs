//! Command-line interface definitions.
//!
//! Global options (verbosity, JSON errors, config file) come before the
//! subcommand.
//!
//! # Example
//!
//! ```bash
//! # Build the collection file from two library roots
//! franchise-builder build /media/movies /media/kids --out config/collections.yml
//!
//! # API key from the environment, JSON output, larger collections only
//! TMDB_API_KEY=... franchise-builder build /media/movies --format json --min-items 3
//!
//! # Inspect and clean the lookup cache
//! franchise-builder cache stats
//! franchise-builder cache prune
//!
//! # Show the effective configuration
//! franchise-builder config show
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::output::OutputFormat;

/// Group a movie library into franchise collections for Kometa.
///
/// Scans library folders, looks each title up on TMDB (with a persistent
/// cache), and writes one collection per franchise found.
#[derive(Debug, Parser)]
#[command(name = "franchise-builder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (TOML). Defaults to the platform config directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan the library and write the collection file
    Build(BuildArgs),
    /// Inspect or clean the lookup cache
    Cache(CacheArgs),
    /// Inspect the configuration
    Config(ConfigArgs),
}

/// Arguments for the build subcommand.
#[derive(Debug, Default, Args)]
pub struct BuildArgs {
    /// Library roots to scan (replaces `scan_roots` from the configuration)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// TMDB v3 API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Lookup cache file
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Minimum titles required to emit a collection
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub min_items: Option<u64>,

    /// Save the cache after every N items (0 saves only at the end)
    #[arg(long, value_name = "N")]
    pub checkpoint_every: Option<usize>,

    /// Look up cached misses again once they are older than this many days
    #[arg(long, value_name = "DAYS")]
    pub negative_ttl_days: Option<u32>,

    /// YAML placed under `collections:` before the generated entries
    #[arg(long, value_name = "PATH")]
    pub preamble: Option<PathBuf>,

    /// Gitignore-style patterns to skip (can be specified multiple times)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links during the scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl BuildArgs {
    /// Apply flags on top of the loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if !self.paths.is_empty() {
            config.scan_roots.clone_from(&self.paths);
        }
        if let Some(key) = &self.api_key {
            config.tmdb_api_key = Some(key.clone());
        }
        if let Some(cache) = &self.cache {
            config.cache_path.clone_from(cache);
        }
        if let Some(out) = &self.out {
            config.output_path.clone_from(out);
        }
        if let Some(format) = self.format {
            config.output_format = format;
        }
        if let Some(min) = self.min_items {
            config.min_items = usize::try_from(min).unwrap_or(usize::MAX);
        }
        if let Some(every) = self.checkpoint_every {
            config.checkpoint_every = every;
        }
        if self.negative_ttl_days.is_some() {
            config.negative_ttl_days = self.negative_ttl_days;
        }
        if self.preamble.is_some() {
            config.preamble_path.clone_from(&self.preamble);
        }
        config
            .ignore_patterns
            .extend(self.ignore_patterns.iter().cloned());
        if self.follow_symlinks {
            config.follow_symlinks = true;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
    }
}

/// Arguments for the cache subcommand.
#[derive(Debug, Args)]
pub struct CacheArgs {
    /// Cache file (defaults to the configured one)
    #[arg(long, global = true, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Cache operation
    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Cache operations.
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Print entry counts
    Stats,
    /// Drop every cached miss so the titles are searched again
    Prune,
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config operation
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config operations.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML (API key redacted)
    Show,
}
