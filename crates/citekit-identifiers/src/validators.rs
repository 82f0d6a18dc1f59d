//! Identifier normalization and validation functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // DOI: "10." + 4-9 digit registrant code + "/" + non-whitespace suffix
    pub(crate) static ref DOI_PATTERN: Regex = Regex::new(r"10\.\d{4,9}/\S+").unwrap();

    // ISBN-10 (trailing check digit may be X) or ISBN-13, separators already removed
    static ref ISBN_PATTERN: Regex = Regex::new(r"^(?:\d{9}[\dXx]|\d{13})$").unwrap();
}

/// URL prefixes that resolve to a DOI, matched case-insensitively
const DOI_PREFIXES: [&str; 5] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

/// Strip at most one known DOI prefix, ignoring ASCII case
pub fn strip_doi_prefix(input: &str) -> &str {
    for prefix in DOI_PREFIXES {
        if input.len() >= prefix.len()
            && input.is_char_boundary(prefix.len())
            && input[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            return input[prefix.len()..].trim_start();
        }
    }
    input
}

/// Strip one pair of surrounding angle brackets ("<10.1000/xyz>")
pub fn strip_angle_brackets(input: &str) -> &str {
    input
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .map(str::trim)
        .unwrap_or(input)
}

/// Normalize a DOI typed by a user: trim, drop brackets and URL prefix,
/// remove trailing punctuation picked up from prose.
pub fn normalize_doi(doi: &str) -> String {
    let stripped = strip_doi_prefix(strip_angle_brackets(doi.trim()));
    clean_doi(stripped)
}

/// Remove trailing sentence punctuation from a DOI
pub(crate) fn clean_doi(doi: &str) -> String {
    doi.trim_end_matches(['.', ',', ';'])
        .trim_end()
        .to_string()
}

/// Normalize an ISBN: keep digits and the check character X only
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect::<String>()
        .to_uppercase()
}

/// Whether the string has the shape of an ISBN-10 or ISBN-13 once hyphens
/// and spaces are removed. No checksum is computed.
pub fn is_isbn_shaped(input: &str) -> bool {
    let compact: String = input
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    ISBN_PATTERN.is_match(&compact)
}

/// Whether the string contains a DOI of the form `10.NNNN/suffix`
pub fn is_valid_doi(doi: &str) -> bool {
    DOI_PATTERN.is_match(doi)
}

/// Validate the check digit of a normalized ISBN-10 or ISBN-13
pub fn is_valid_isbn_checksum(isbn: &str) -> bool {
    let normalized = normalize_isbn(isbn);
    match normalized.len() {
        10 => validate_isbn10(&normalized),
        13 => validate_isbn13(&normalized),
        _ => false,
    }
}

fn validate_isbn10(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            _ => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

fn validate_isbn13(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let Some(value) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { value } else { value * 3 };
    }
    sum % 10 == 0
}
