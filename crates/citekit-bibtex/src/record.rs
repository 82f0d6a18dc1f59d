//! BibTeX generation from bibliographic records

use citekit_domain::{Author, BibliographicRecord, SourceKind};

use crate::entry::{BibTeXEntry, BibTeXEntryType};
use crate::formatter::{escape_value, format_entry};

/// Cite key: uppercased first-author family name followed by the year.
///
/// Falls back to "Unknown" when the record has no authors. Characters that
/// are not letters or digits are dropped so the key stays valid BibTeX.
pub fn cite_key(record: &BibliographicRecord) -> String {
    let name = record
        .authors
        .first()
        .map(|a| a.family_name().to_uppercase())
        .unwrap_or_else(|| "Unknown".to_string());

    format!("{}{}", name, record.year)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Build a BibTeX entry: `@article` for DOI records, `@book` for ISBN records
pub fn record_to_entry(record: &BibliographicRecord) -> BibTeXEntry {
    match record.source {
        SourceKind::Doi => article_entry(record),
        SourceKind::Isbn => book_entry(record),
    }
}

/// Render a record as a BibTeX entry string
pub fn format_bibtex(record: &BibliographicRecord) -> String {
    format_entry(&record_to_entry(record))
}

fn article_entry(record: &BibliographicRecord) -> BibTeXEntry {
    let mut entry = BibTeXEntry::new(cite_key(record), BibTeXEntryType::Article);
    add_authors(&mut entry, &record.authors);
    entry.add_field("title", escape_value(&record.title));
    entry.add_optional_field("journal", record.venue.as_deref().map(escape_value).as_deref());
    entry.add_optional_field("volume", record.volume.as_deref());
    entry.add_optional_field("number", record.issue.as_deref());
    entry.add_optional_field("pages", record.pages.as_deref());
    entry.add_field("year", record.year.as_str());
    entry.add_optional_field("doi", Some(record.identifier.as_str()));
    entry
}

fn book_entry(record: &BibliographicRecord) -> BibTeXEntry {
    let mut entry = BibTeXEntry::new(cite_key(record), BibTeXEntryType::Book);
    add_authors(&mut entry, &record.authors);
    entry.add_field("title", escape_value(&record.title));
    entry.add_optional_field(
        "publisher",
        record.publisher.as_deref().map(escape_value).as_deref(),
    );
    entry.add_optional_field("address", record.place.as_deref().map(escape_value).as_deref());
    entry.add_optional_field("edition", record.edition.as_deref());
    entry.add_field("year", record.year.as_str());
    entry.add_optional_field("isbn", Some(record.identifier.as_str()));
    entry.add_optional_field("url", record.url.as_deref());
    entry
}

/// Authors joined with " and ": "Family, Given" for structured names,
/// the raw display name for flat ones
fn add_authors(entry: &mut BibTeXEntry, authors: &[Author]) {
    if authors.is_empty() {
        return;
    }
    let joined = authors
        .iter()
        .map(|a| escape_value(&a.to_bibtex_format()))
        .collect::<Vec<_>>()
        .join(" and ");
    entry.add_field("author", joined);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> BibliographicRecord {
        BibliographicRecord::new(
            SourceKind::Doi,
            "10.1016/S1874-1029(13)60024-5",
            "Detection & Tracking",
            "2013",
        )
        .with_authors(vec![
            Author::structured("Zhang", Some("Wei".to_string())),
            Author::structured("Li", Some("Ming".to_string())),
        ])
        .with_venue("Acta Automatica Sinica")
        .with_volume("39")
        .with_issue("3")
        .with_pages("230-240")
    }

    fn book() -> BibliographicRecord {
        BibliographicRecord::new(
            SourceKind::Isbn,
            "9780131101630",
            "The C Programming Language",
            "1988",
        )
        .with_authors(vec![
            Author::flat("Brian W. Kernighan"),
            Author::flat("Dennis M. Ritchie"),
        ])
        .with_publisher("Prentice Hall")
        .with_place("Englewood Cliffs, N.J.")
        .with_edition("2nd ed.")
        .with_url("https://openlibrary.org/books/OL2030592M")
    }

    #[test]
    fn test_article_entry() {
        let bibtex = format_bibtex(&article());
        assert_eq!(
            bibtex,
            "@article{ZHANG2013,\n\
             \x20   author = {Zhang, Wei and Li, Ming},\n\
             \x20   title = {Detection \\& Tracking},\n\
             \x20   journal = {Acta Automatica Sinica},\n\
             \x20   volume = 39,\n\
             \x20   number = 3,\n\
             \x20   pages = {230-240},\n\
             \x20   year = 2013,\n\
             \x20   doi = {10.1016/S1874-1029(13)60024-5},\n\
             }"
        );
    }

    #[test]
    fn test_book_entry() {
        let entry = record_to_entry(&book());
        assert_eq!(entry.entry_type, BibTeXEntryType::Book);
        assert_eq!(entry.cite_key, "KERNIGHAN1988");
        assert_eq!(
            entry.get_field("author"),
            Some("Brian W. Kernighan and Dennis M. Ritchie")
        );
        assert_eq!(entry.get_field("publisher"), Some("Prentice Hall"));
        assert_eq!(entry.get_field("address"), Some("Englewood Cliffs, N.J."));
        assert_eq!(entry.get_field("isbn"), Some("9780131101630"));
        assert!(entry.get_field("doi").is_none());

        let text = format_bibtex(&book());
        assert!(text.starts_with("@book{KERNIGHAN1988,\n"));
        assert!(text.contains("    year = 1988,\n"));
    }

    #[test]
    fn test_cite_key_without_authors() {
        let record = BibliographicRecord::new(SourceKind::Doi, "10.1000/x", "T", "2020");
        assert_eq!(cite_key(&record), "Unknown2020");
        assert!(record_to_entry(&record).get_field("author").is_none());
    }

    #[test]
    fn test_cite_key_strips_spaces_and_punctuation() {
        let record = BibliographicRecord::new(SourceKind::Doi, "10.1000/x", "T", "n.d.")
            .with_authors(vec![Author::structured("van der Berg", None)]);
        assert_eq!(cite_key(&record), "VANDERBERGnd");
    }

    #[test]
    fn test_doi_with_underscore_is_not_escaped() {
        let record = BibliographicRecord::new(SourceKind::Doi, "10.1000/a_b", "T", "2020");
        assert_eq!(record_to_entry(&record).get_field("doi"), Some("10.1000/a_b"));
    }
}
