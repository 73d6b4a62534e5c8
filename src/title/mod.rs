//! Title parsing for scanned media names.
//!
//! Two independent, pure transformations live here:
//!
//! * [`canonical`]: turns a raw folder or file name such as
//!   `"Toy Story 2 (1999) 1080p BluRay"` into a display title and an optional
//!   release year.
//! * [`normalize`]: derives a franchise matching key such as `"toy story"`.
//!   The key is only ever used to compare titles against curated patterns; it
//!   is never shown to the user and never used as a cache key.
//!
//! # Example
//!
//! ```
//! use franchise_builder::title::{normalize, parse_title_year};
//!
//! let (title, year) = parse_title_year("Toy Story 3 (2010) 2160p HDR");
//! assert_eq!(title, "Toy Story 3");
//! assert_eq!(year, Some(2010));
//! assert_eq!(normalize(&title), "toy story");
//! ```

pub mod canonical;
pub mod normalize;

pub use canonical::parse_title_year;
pub use normalize::{normalize, words_to_number};
