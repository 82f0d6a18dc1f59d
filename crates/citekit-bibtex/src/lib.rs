//! BibTeX formatting for citekit
//!
//! Builds `@article` entries for DOI-sourced records and `@book` entries for
//! ISBN-sourced records, then renders them as BibTeX text.

mod entry;
mod formatter;
mod record;

pub use entry::{BibTeXEntry, BibTeXEntryType, BibTeXField};
pub use formatter::{escape_value, format_entry};
pub use record::{cite_key, format_bibtex, record_to_entry};
