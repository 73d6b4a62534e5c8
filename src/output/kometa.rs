//! Kometa collection YAML.
//!
//! ```yaml
//! collections:
//!   "Toy Story Collection":
//!     visible_library: true
//!     collection_order: release
//!     sort_title: "Toy Story Collection"
//!     plex_search:
//!       any:
//!         title:
//!           - "Toy Story"
//!           - "Toy Story 2"
//! ```
//!
//! Blocks are separated by a blank line. A preamble, when given, is placed
//! right under `collections:` with its lines indented by two spaces.

use std::fmt::Write as _;

use crate::collections::Collection;

/// Renders collections as a Kometa collection file.
#[derive(Debug, Clone)]
pub struct KometaOutput<'a> {
    collections: &'a [Collection],
    preamble: Option<&'a str>,
}

impl<'a> KometaOutput<'a> {
    /// Create a renderer over already sorted collections.
    #[must_use]
    pub fn new(collections: &'a [Collection]) -> Self {
        Self {
            collections,
            preamble: None,
        }
    }

    /// Add a static block of collection definitions, written before the
    /// generated ones. It is expected to be indented relative to the
    /// `collections:` root already.
    #[must_use]
    pub fn with_preamble(mut self, preamble: Option<&'a str>) -> Self {
        self.preamble = preamble;
        self
    }

    /// Render the whole document. Always ends with exactly one newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("collections:\n");

        if let Some(preamble) = self.preamble {
            let trimmed = preamble.trim();
            if !trimmed.is_empty() {
                for line in trimmed.lines() {
                    if line.trim().is_empty() {
                        out.push('\n');
                    } else {
                        let _ = writeln!(out, "  {line}");
                    }
                }
                out.push('\n');
            }
        }

        for collection in self.collections {
            let name = quote(&collection.name);
            let _ = writeln!(out, "  {name}:");
            out.push_str("    visible_library: true\n");
            out.push_str("    collection_order: release\n");
            let _ = writeln!(out, "    sort_title: {name}");
            out.push_str("    plex_search:\n");
            out.push_str("      any:\n");
            out.push_str("        title:\n");
            for member in &collection.members {
                let _ = writeln!(out, "          - {}", quote(member));
            }
            out.push('\n');
        }

        let end = out.trim_end().len();
        out.truncate(end);
        out.push('\n');
        out
    }
}

/// Double-quoted YAML scalar.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c if c.is_control() => {
                let _ = write!(quoted, "\\u{:04x}", u32::from(c));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_story() -> Collection {
        Collection {
            name: "Toy Story Collection".to_string(),
            members: vec![
                "Toy Story".to_string(),
                "Toy Story 2".to_string(),
                "Toy Story 3".to_string(),
            ],
        }
    }

    #[test]
    fn test_render_single_collection() {
        let collections = vec![toy_story()];
        let yaml = KometaOutput::new(&collections).render();
        let expected = "\
collections:
  \"Toy Story Collection\":
    visible_library: true
    collection_order: release
    sort_title: \"Toy Story Collection\"
    plex_search:
      any:
        title:
          - \"Toy Story\"
          - \"Toy Story 2\"
          - \"Toy Story 3\"
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(KometaOutput::new(&[]).render(), "collections:\n");
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let mut second = toy_story();
        second.name = "Zorro Collection".to_string();
        let collections = vec![toy_story(), second];
        let yaml = KometaOutput::new(&collections).render();

        assert!(yaml.contains("\"Toy Story 3\"\n\n  \"Zorro Collection\":\n"));
        assert!(yaml.ends_with("\"Toy Story 3\"\n"));
    }

    #[test]
    fn test_preamble_indented_under_root() {
        let preamble = "\nHoliday:\n  smart_filter:\n    all:\n      genre: Holiday\n\n";
        let collections = vec![toy_story()];
        let yaml = KometaOutput::new(&collections)
            .with_preamble(Some(preamble))
            .render();

        assert!(yaml.starts_with(
            "collections:\n  Holiday:\n    smart_filter:\n      all:\n        genre: Holiday\n\n  \"Toy Story Collection\":"
        ));
    }

    #[test]
    fn test_blank_preamble_ignored() {
        let yaml = KometaOutput::new(&[]).with_preamble(Some("  \n")).render();
        assert_eq!(yaml, "collections:\n");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("Plain"), "\"Plain\"");
        assert_eq!(quote("Say \"Hi\""), "\"Say \\\"Hi\\\"\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote("Ocean's: Eleven"), "\"Ocean's: Eleven\"");
        assert_eq!(quote("bell\u{7}"), "\"bell\\u0007\"");
    }
}
