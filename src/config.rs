//! Layered application configuration.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file: `--config <PATH>`, else `config.toml` in the platform
//!    config directory (skipped when absent)
//! 3. Environment variables prefixed `FRANCHISE_`, with `__` for nesting
//!    (`FRANCHISE_MIN_ITEMS=3`, `FRANCHISE_CURATED_COLLECTIONS__...`)
//! 4. Command-line flags, applied by the caller on the extracted value
//!
//! ```toml
//! scan_roots = ["/media/movies", "/media/kids"]
//! min_items = 2
//! negative_ttl_days = 30
//!
//! [curated_collections]
//! "Hocus Pocus Collection" = ["Hocus Pocus"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::collections::curated;
use crate::metadata::tmdb::DEFAULT_BASE_URL;
use crate::output::OutputFormat;

/// Prefix of the environment variables read by [`Config::figment`].
pub const ENV_PREFIX: &str = "FRANCHISE_";

/// Errors that can occur while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or did not match the schema.
    #[error("Invalid configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A value is out of range.
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The effective configuration could not be rendered.
    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library roots to scan
    pub scan_roots: Vec<PathBuf>,
    /// Gitignore-style patterns excluded from the scan
    pub ignore_patterns: Vec<String>,
    /// Follow symbolic links while scanning
    pub follow_symlinks: bool,
    /// Lookup cache file
    pub cache_path: PathBuf,
    /// Generated collection file
    pub output_path: PathBuf,
    /// Format of the generated file
    pub output_format: OutputFormat,
    /// Smallest collection worth emitting
    pub min_items: usize,
    /// Save the cache after every N resolved items; 0 saves only at the end
    pub checkpoint_every: usize,
    /// Re-search cached misses older than this many days; unset keeps them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_ttl_days: Option<u32>,
    /// TMDB v3 API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_api_key: Option<String>,
    /// TMDB API base URL
    pub tmdb_base_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Static YAML placed before the generated collections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preamble_path: Option<PathBuf>,
    /// Fallback collections: name to title patterns
    pub curated_collections: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_roots: Vec::new(),
            ignore_patterns: Vec::new(),
            follow_symlinks: false,
            cache_path: PathBuf::from("generated/kometa/tmdb_cache.json"),
            output_path: PathBuf::from("generated/kometa/collections.yml"),
            output_format: OutputFormat::Kometa,
            min_items: 2,
            checkpoint_every: 0,
            negative_ttl_days: None,
            tmdb_api_key: None,
            tmdb_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            preamble_path: None,
            curated_collections: curated::default_table(),
        }
    }
}

impl Config {
    /// Default platform-specific configuration file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "franchise-builder", "franchise-builder")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The figment for defaults, `file` (or the default path) and the
    /// environment.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        let file = file.map(Path::to_path_buf).or_else(Self::default_path);
        if let Some(path) = file {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source is malformed or a value is out of
    /// range. A missing configuration file is not an error.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(file))
    }

    /// Extract and validate from an already assembled figment.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_items == 0 {
            return Err(ConfigError::Invalid {
                field: "min_items",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tmdb_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "tmdb_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Negative cache TTL as a duration.
    #[must_use]
    pub fn negative_ttl(&self) -> Option<chrono::Duration> {
        self.negative_ttl_days
            .map(|days| chrono::Duration::days(i64::from(days)))
    }

    /// Render as TOML with the API key redacted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.tmdb_api_key.is_some() {
            shown.tmdb_api_key = Some("********".to_string());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}
