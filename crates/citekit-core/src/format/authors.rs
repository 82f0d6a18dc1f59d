//! Author lists and in-text citations

use citekit_domain::{Author, Style};

/// Placeholder for records without authors
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Render one author: "J.-M. Smith" for IEEE, "Smith, J.-M." otherwise.
/// Authors without initials render as the family name alone.
pub fn format_author(author: &Author, style: Style) -> String {
    let name = author.resolve();
    match (name.initials, style.is_numbered()) {
        (Some(initials), true) => format!("{} {}", initials, name.family),
        (Some(initials), false) => format!("{}, {}", name.family, initials),
        (None, _) => name.family,
    }
}

/// Join an author list with the style's separators.
///
/// | authors | IEEE              | APA / Harvard   |
/// |---------|-------------------|-----------------|
/// | 1       | `A`               | `A`             |
/// | 2       | `A and B`         | `A & B`         |
/// | 3+      | `A, B, and C`     | `A, B & C`      |
pub fn format_authors(authors: &[Author], style: Style) -> String {
    let formatted: Vec<String> = authors.iter().map(|a| format_author(a, style)).collect();

    let (pair_sep, last_sep) = if style.is_numbered() {
        (" and ", ", and ")
    } else {
        (" & ", " & ")
    };

    match formatted.as_slice() {
        [] => UNKNOWN_AUTHOR.to_string(),
        [only] => only.clone(),
        [first, second] => format!("{}{}{}", first, pair_sep, second),
        [rest @ .., last] => format!("{}{}{}", rest.join(", "), last_sep, last),
    }
}

/// Parenthetical reference: "(Smith, 2020)", "(Smith & Jones, 2020)",
/// "(Smith et al., 2020)".
pub fn in_text_citation(authors: &[Author], year: &str) -> String {
    match authors {
        [] => format!("({}, {})", UNKNOWN_AUTHOR, year),
        [only] => format!("({}, {})", only.family_name(), year),
        [first, second] => format!("({} & {}, {})", first.family_name(), second.family_name(), year),
        [first, ..] => format!("({} et al., {})", first.family_name(), year),
    }
}
