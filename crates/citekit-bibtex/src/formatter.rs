//! BibTeX formatting module
//!
//! Converts BibTeXEntry structures to BibTeX string format.

use super::entry::BibTeXEntry;

/// Format a single BibTeX entry to string
pub fn format_entry(entry: &BibTeXEntry) -> String {
    let mut result = String::new();

    // Entry type and cite key
    result.push('@');
    result.push_str(entry.entry_type.as_str());
    result.push('{');
    result.push_str(&entry.cite_key);
    result.push(',');
    result.push('\n');

    for field in &entry.fields {
        result.push_str("    ");
        result.push_str(&field.key);
        result.push_str(" = ");
        result.push_str(&format_field_value(&field.value));
        result.push(',');
        result.push('\n');
    }

    result.push('}');
    result
}

/// Format a field value, choosing appropriate delimiters
fn format_field_value(value: &str) -> String {
    // Purely numeric values need no delimiters
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }

    let mut result = String::with_capacity(value.len() + 2);
    result.push('{');
    result.push_str(&balance_braces(value));
    result.push('}');
    result
}

/// Drop braces that have no partner so the value cannot close its
/// delimiter early or swallow the rest of the entry
fn balance_braces(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut keep = vec![true; chars.len()];
    let mut open = Vec::new();

    for (i, c) in chars.iter().enumerate() {
        match c {
            '{' => open.push(i),
            '}' => {
                if open.pop().is_none() {
                    keep[i] = false;
                }
            }
            _ => {}
        }
    }
    for i in open {
        keep[i] = false;
    }

    chars
        .into_iter()
        .zip(keep)
        .filter_map(|(c, k)| k.then_some(c))
        .collect()
}

/// Escape special BibTeX characters in a value
pub fn escape_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '#' | '$' | '%' | '&' | '_' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
