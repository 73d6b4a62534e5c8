//! Raw folder/file name → (title, year).
//!
//! Scanned names usually follow the `Title (YYYY)` convention used by Plex and
//! friends, often with release tags glued on: `Heat (1995) 1080p BluRay x264`.
//! [`parse_title_year`] removes the tags, pulls out the year, and returns a
//! title that is stable under re-parsing.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Quality, codec, and resolution tags stripped from names.
pub const QUALITY_TOKENS: &[&str] = &[
    "480p", "720p", "1080p", "2160p", "4k", "x264", "x265", "h264", "h265", "bluray", "webrip",
    "web-dl", "hdr", "hevc", "aac", "dts", "ac3",
];

static YEAR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(([0-9]{4})\)$").expect("year suffix pattern is valid"));

static QUALITY: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = QUALITY_TOKENS
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("quality token pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Parse a raw media name into a display title and an optional release year.
///
/// Steps, in order:
///
/// 1. NFC-normalize the name.
/// 2. Remove every [`QUALITY_TOKENS`] entry (whole word, case-insensitive).
/// 3. Collapse runs of whitespace and trim.
/// 4. Remove trailing `(YYYY)` suffixes. When several are stacked the
///    right-most one is reported as the year.
///
/// The returned title is a fixed point: feeding it back in returns the same
/// title and no year.
///
/// # Examples
///
/// ```
/// use franchise_builder::title::parse_title_year;
///
/// assert_eq!(
///     parse_title_year("Toy Story (1995)"),
///     ("Toy Story".to_string(), Some(1995))
/// );
/// assert_eq!(
///     parse_title_year("Heat 1080p  BluRay"),
///     ("Heat".to_string(), None)
/// );
/// ```
#[must_use]
pub fn parse_title_year(name: &str) -> (String, Option<u16>) {
    let mut title: String = name.nfc().collect();

    // One pass can expose nothing new, but looping keeps the fixed point
    // guarantee independent of the token list.
    loop {
        let stripped = QUALITY.replace_all(&title, "");
        if stripped == title {
            break;
        }
        title = stripped.into_owned();
    }

    let mut title = WHITESPACE.replace_all(&title, " ").trim().to_string();

    let mut year = None;
    while let Some(caps) = YEAR_SUFFIX.captures(&title) {
        let (start, digits) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(digits)) => (whole.start(), digits.as_str()),
            _ => break,
        };
        if year.is_none() {
            year = digits.parse().ok();
        }
        title.truncate(start);
    }

    (title.trim().to_string(), year)
}
