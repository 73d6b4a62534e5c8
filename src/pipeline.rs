//! The build pipeline: scan, resolve, group, render.
//!
//! ```text
//! scan roots ──► MediaItem* ──► Resolver (cache, service) ──► CollectionGrouper
//!                                   │ checkpoint saves               │
//!                                   ▼                                ▼
//!                              cache file                   Kometa YAML / JSON
//! ```
//!
//! Items are resolved one after another. A transient service failure skips
//! the item for this run; a cache or output write failure aborts the run.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::cache::{CacheError, CacheStore};
use crate::collections::{Collection, CollectionGrouper, CuratedCollections, GroupingStats};
use crate::config::Config;
use crate::error::ExitCode;
use crate::inventory::{scan_roots, MediaItem, ScanConfig};
use crate::metadata::{MetadataService, Resolver, ResolverStats};
use crate::output::{self, JsonOutput, KometaOutput, OutputFormat};
use crate::progress::{Phase, ProgressCallback};

/// Settings for [`resolve_and_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupOptions {
    /// Smallest collection worth emitting
    pub min_items: usize,
    /// Save the cache after this many processed items; 0 disables
    pub checkpoint_every: usize,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            min_items: 2,
            checkpoint_every: 0,
        }
    }
}

/// Counters for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Items found by the scan
    pub items_processed: usize,
    /// Non-fatal scan problems
    pub scan_errors: usize,
    /// Resolver counters
    pub resolver: ResolverStats,
    /// Grouping counters
    pub grouping: GroupingStats,
    /// Collections written
    pub collections_emitted: usize,
    /// Entries in the cache after the run
    pub cache_entries: usize,
    /// Cache file
    pub cache_path: PathBuf,
    /// Generated file
    pub output_path: PathBuf,
    /// Wall time
    pub duration: Duration,
}

impl BuildSummary {
    /// Exit code describing this build.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::for_build(self.collections_emitted, self.resolver.transient_failures)
    }

    /// Human-readable report, one fact per line.
    #[must_use]
    pub fn report(&self) -> String {
        format!(
            "Items processed:    {}\n\
             Resolved:           {}\n\
             Not found:          {}\n\
             Lookup failures:    {}\n\
             Collections:        {}\n\
             Cache entries:      {} -> {}\n\
             Output:             {}",
            self.items_processed,
            self.resolver.resolved,
            self.resolver.misses,
            self.resolver.transient_failures,
            self.collections_emitted,
            self.cache_entries,
            self.cache_path.display(),
            self.output_path.display(),
        )
    }
}

/// Result of a complete build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Emitted collections, in output order
    pub collections: Vec<Collection>,
    /// Counters
    pub summary: BuildSummary,
}

/// Resolve every item and group the results.
///
/// The cache is saved every `checkpoint_every` items when it has changes,
/// and always once at the end.
///
/// # Errors
///
/// Returns [`CacheError`] when a save fails. Lookup failures are not errors.
pub fn resolve_and_group<S: MetadataService>(
    items: &[MediaItem],
    resolver: &mut Resolver<S>,
    curated: &CuratedCollections,
    options: GroupOptions,
    progress: &dyn ProgressCallback,
) -> Result<(Vec<Collection>, GroupingStats), CacheError> {
    let mut grouper = CollectionGrouper::new();

    progress.on_phase_start(Phase::Resolve, items.len());
    for (index, item) in items.iter().enumerate() {
        let resolution = resolver.resolve(&item.title, item.year, &item.path);
        grouper.record(item, &resolution);
        progress.on_progress(index + 1, &item.title);

        if options.checkpoint_every > 0
            && (index + 1) % options.checkpoint_every == 0
            && resolver.cache().is_dirty()
        {
            log::debug!("Checkpoint after {} items", index + 1);
            resolver.cache_mut().save()?;
        }
    }
    progress.on_phase_end(Phase::Resolve);

    resolver.cache_mut().save()?;

    let grouped = grouper.finish(curated, options.min_items);
    log::info!(
        "Grouped {} collections ({} from the service, {} curated, {} below minimum)",
        grouped.len(),
        grouped.stats.from_service,
        grouped.stats.from_curated,
        grouped.stats.below_minimum
    );
    Ok((grouped.collections, grouped.stats))
}

/// Render collections in the configured format.
///
/// # Errors
///
/// Fails when the preamble cannot be read or JSON serialization fails.
pub fn render(
    collections: &[Collection],
    summary: &BuildSummary,
    format: OutputFormat,
    preamble_path: Option<&Path>,
) -> Result<String, output::OutputError> {
    match format {
        OutputFormat::Kometa => {
            let preamble = preamble_path.map(output::read_preamble).transpose()?;
            Ok(KometaOutput::new(collections)
                .with_preamble(preamble.as_deref())
                .render())
        }
        OutputFormat::Json => {
            Ok(JsonOutput::new(collections, summary, summary.exit_code()).render()?)
        }
    }
}

/// Run a full build with `config` against `service`.
///
/// # Errors
///
/// Fails on cache read/write errors and on output errors. Missing scan
/// roots and lookup failures are reported in the summary instead.
pub fn run_build<S: MetadataService>(
    config: &Config,
    service: S,
    progress: &dyn ProgressCallback,
) -> Result<BuildOutcome> {
    let started = Instant::now();

    progress.on_phase_start(Phase::Scan, 0);
    let scan_config = ScanConfig {
        ignore_patterns: config.ignore_patterns.clone(),
        follow_symlinks: config.follow_symlinks,
    };
    let inventory = scan_roots(&config.scan_roots, &scan_config);
    progress.on_phase_end(Phase::Scan);
    log::info!(
        "Found {} items in {} root(s)",
        inventory.items.len(),
        config.scan_roots.len()
    );

    let cache = CacheStore::load(&config.cache_path).context("Failed to load the lookup cache")?;
    let mut resolver = Resolver::new(service, cache).with_negative_ttl(config.negative_ttl());
    let curated = CuratedCollections::new(&config.curated_collections);
    let options = GroupOptions {
        min_items: config.min_items,
        checkpoint_every: config.checkpoint_every,
    };

    let (collections, grouping) =
        resolve_and_group(&inventory.items, &mut resolver, &curated, options, progress)
            .context("Failed to save the lookup cache")?;

    let summary = BuildSummary {
        items_processed: inventory.items.len(),
        scan_errors: inventory.errors.len(),
        resolver: resolver.stats(),
        grouping,
        collections_emitted: collections.len(),
        cache_entries: resolver.cache().len(),
        cache_path: config.cache_path.clone(),
        output_path: config.output_path.clone(),
        duration: started.elapsed(),
    };

    let rendered = render(
        &collections,
        &summary,
        config.output_format,
        config.preamble_path.as_deref(),
    )
    .context("Failed to render collections")?;
    output::write_output(&config.output_path, &rendered)
        .context("Failed to write collections")?;

    log::info!(
        "Wrote {} collections to {}",
        collections.len(),
        config.output_path.display()
    );

    Ok(BuildOutcome {
        collections,
        summary,
    })
}
