//! Curated fallback collections.
//!
//! Some franchises have no collection in the metadata service (duologies,
//! remakes, loose spin-offs). They are described in configuration as a
//! collection name plus substring patterns and matched against the scanned
//! titles.

use std::collections::{BTreeMap, BTreeSet};

use crate::title::normalize::{fold_tokens, normalize};

/// One pattern, pre-lowered and pre-tokenized.
#[derive(Debug, Clone)]
struct Pattern {
    lowered: String,
    /// Number-folded tokens, kept only when normalizing the pattern loses
    /// nothing (no subtitle, year or sequel marker to strip).
    folded: Option<Vec<String>>,
}

impl Pattern {
    fn new(raw: &str) -> Self {
        let tokens = fold_tokens(raw);
        let lossless = !tokens.is_empty() && normalize(raw) == tokens.join(" ");
        Self {
            lowered: raw.to_lowercase(),
            folded: lossless.then_some(tokens),
        }
    }

    /// Case-insensitive substring match, or a whole-token match once number
    /// words are folded (so "101 Dalmatians" finds
    /// "One Hundred and One Dalmatians").
    fn matches(&self, title_lowered: &str, title_tokens: &[String]) -> bool {
        if !self.lowered.is_empty() && title_lowered.contains(&self.lowered) {
            return true;
        }
        self.folded.as_ref().is_some_and(|folded| {
            title_tokens
                .windows(folded.len())
                .any(|window| window == folded.as_slice())
        })
    }
}

/// Curated collection table: name → patterns.
#[derive(Debug, Clone, Default)]
pub struct CuratedCollections {
    entries: BTreeMap<String, Vec<Pattern>>,
}

impl CuratedCollections {
    /// Build the table from configuration.
    #[must_use]
    pub fn new(table: &BTreeMap<String, Vec<String>>) -> Self {
        let entries = table
            .iter()
            .map(|(name, patterns)| {
                let patterns = patterns
                    .iter()
                    .filter(|p| !p.trim().is_empty())
                    .map(|p| Pattern::new(p))
                    .collect();
                (name.clone(), patterns)
            })
            .collect();
        Self { entries }
    }

    /// Number of curated collections configured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no curated collections are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match every curated collection against `titles`.
    ///
    /// Returns, per collection name, the distinct titles that contain any of
    /// its patterns. Collections with no hit are still present with an empty
    /// set so callers can report them.
    #[must_use]
    pub fn match_titles(&self, titles: &BTreeSet<String>) -> BTreeMap<String, BTreeSet<String>> {
        let prepared: Vec<(&String, String, Vec<String>)> = titles
            .iter()
            .map(|t| (t, t.to_lowercase(), fold_tokens(t)))
            .collect();

        self.entries
            .iter()
            .map(|(name, patterns)| {
                let hits = prepared
                    .iter()
                    .filter(|(_, lowered, tokens)| {
                        patterns.iter().any(|p| p.matches(lowered, tokens))
                    })
                    .map(|(title, _, _)| (*title).clone())
                    .collect();
                (name.clone(), hits)
            })
            .collect()
    }
}

/// Franchises without a usable collection in the metadata service.
const DEFAULT_CURATED: &[(&str, &[&str])] = &[
    ("Anchorman Collection", &["Anchorman"]),
    ("Joe Dirt Collection", &["Joe Dirt"]),
    ("Happy Gilmore Collection", &["Happy Gilmore"]),
    ("Grown Ups Collection", &["Grown Ups"]),
    ("George of the Jungle Collection", &["George of the Jungle"]),
    ("Hocus Pocus Collection", &["Hocus Pocus"]),
    ("Spider-Verse Collection", &["Spider-Man", "Spiderverse"]),
    (
        "101 Dalmatians Collection",
        &["101 Dalmatians", "One Hundred and One Dalmatians"],
    ),
];

/// The franchise table shipped as the default configuration.
#[must_use]
pub fn default_table() -> BTreeMap<String, Vec<String>> {
    DEFAULT_CURATED
        .iter()
        .map(|(name, patterns)| {
            (
                (*name).to_string(),
                patterns.iter().map(|p| (*p).to_string()).collect(),
            )
        })
        .collect()
}
