//! Franchise matching keys.
//!
//! [`normalize`] collapses every entry of a franchise onto the same key:
//! `"Toy Story 3"`, `"Toy Story II"` and `"Toy Story: Toy Story of Terror"`
//! all become `"toy story"`. Spelled-out numbers are folded into digits so
//! `"One Hundred and One Dalmatians"` and `"101 Dalmatians"` agree.
//!
//! The key is lossy on purpose and is used only for curated-pattern matching.

use std::sync::LazyLock;

use regex::Regex;

/// Subtitle separators. Everything after the earliest one is discarded.
const SEPARATORS: &[&str] = &[":", " - ", " \u{2013} ", " \u{2014} "];

/// Lowercase roman numerals treated as sequel markers.
const ROMAN_NUMERALS: &[&str] = &[
    "i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x", "xi", "xii", "xiii", "xiv", "xv",
];

static YEAR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(([0-9]{4})\)$").expect("year suffix pattern is valid"));

/// Value of a single English number word.
fn number_word(word: &str) -> Option<u64> {
    let value = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        "hundred" => 100,
        "thousand" => 1000,
        _ => return None,
    };
    Some(value)
}

fn is_number_word(word: &str) -> bool {
    number_word(word).is_some()
}

/// Convert a run of English number words into its value.
///
/// Ones and tens accumulate additively. `hundred` multiplies the current
/// group; `thousand` multiplies it and flushes it into the running total.
/// Conversion stops at the first word that is not a number word. Returns
/// `None` if the run does not start with a number word.
///
/// # Examples
///
/// ```
/// use franchise_builder::title::words_to_number;
///
/// assert_eq!(words_to_number(&["twenty", "one"]), Some(21));
/// assert_eq!(words_to_number(&["one", "hundred"]), Some(100));
/// assert_eq!(words_to_number(&["two", "thousand"]), Some(2000));
/// assert_eq!(words_to_number(&["toy"]), None);
/// ```
#[must_use]
pub fn words_to_number<S: AsRef<str>>(words: &[S]) -> Option<u64> {
    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut found = false;

    for word in words {
        let Some(value) = number_word(word.as_ref()) else {
            break;
        };
        found = true;
        match value {
            100 => current = current.max(1).saturating_mul(100),
            1000 => {
                current = current.max(1).saturating_mul(1000);
                total = total.saturating_add(current);
                current = 0;
            }
            _ => current = current.saturating_add(value),
        }
    }

    found.then(|| total.saturating_add(current))
}

fn is_sequel_marker(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit()) || ROMAN_NUMERALS.contains(&token)
}

/// Cut the title at the earliest subtitle separator.
fn truncate_at_separator(title: &str) -> &str {
    SEPARATORS
        .iter()
        .filter_map(|sep| title.find(sep))
        .min()
        .map_or(title, |idx| &title[..idx])
}

/// Build the franchise matching key for a title.
///
/// Steps, in order: drop a trailing `(YYYY)`; truncate at the first subtitle
/// separator (`:`, ` - `, ` – `, ` — `); replace `&` with `and`; lowercase and
/// split on anything that is not alphanumeric; fold runs of number words into
/// digits (`and` between two number words belongs to the run); drop trailing
/// all-digit tokens and roman numerals `i`..`xv`.
///
/// The function is idempotent.
///
/// # Examples
///
/// ```
/// use franchise_builder::title::normalize;
///
/// assert_eq!(normalize("Toy Story 3"), "toy story");
/// assert_eq!(normalize("Spider-Man 2"), "spider man");
/// assert_eq!(normalize("Rocky IV (1985)"), "rocky");
/// assert_eq!(normalize("One Hundred and One Dalmatians"), "101 dalmatians");
/// ```
#[must_use]
pub fn normalize(title: &str) -> String {
    let without_year = YEAR_SUFFIX.replace(title, "");
    let mut out = fold_tokens(truncate_at_separator(&without_year));

    while out.last().is_some_and(|t| is_sequel_marker(t)) {
        out.pop();
    }

    out.join(" ")
}

/// Lowercase word tokens of `text` with number-word runs folded into digits.
///
/// Nothing is dropped: no separator truncation, no year or sequel stripping.
pub(crate) fn fold_tokens(text: &str) -> Vec<String> {
    let lowered = text.replace('&', " and ").to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if is_number_word(tokens[i]) {
            let mut run = vec![tokens[i]];
            let mut j = i + 1;
            while j < tokens.len() {
                if is_number_word(tokens[j]) {
                    run.push(tokens[j]);
                } else if tokens[j] != "and"
                    || !tokens.get(j + 1).is_some_and(|next| is_number_word(next))
                {
                    break;
                }
                j += 1;
            }
            if let Some(value) = words_to_number(&run) {
                out.push(value.to_string());
                i = j;
                continue;
            }
        }
        out.push(tokens[i].to_string());
        i += 1;
    }
    out
}
