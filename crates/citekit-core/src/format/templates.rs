//! Per-style citation templates for articles (DOI) and books (ISBN)

use citekit_domain::{BibliographicRecord, Style};

use super::CitationMarkup;

/// Record fields prepared for a template, escaped for the markup
struct Fields {
    authors: String,
    title: String,
    year: String,
    doi: String,
}

impl Fields {
    fn new(record: &BibliographicRecord, authors: &str, markup: CitationMarkup) -> Self {
        Self {
            authors: text(authors, markup),
            title: text(&record.title, markup),
            year: text(&record.year, markup),
            doi: text(&record.identifier, markup),
        }
    }
}

pub(super) fn article(
    record: &BibliographicRecord,
    authors: &str,
    style: Style,
    ref_index: usize,
    markup: CitationMarkup,
) -> String {
    let f = Fields::new(record, authors, markup);
    let journal = text(record.venue.as_deref().unwrap_or("Unknown Journal"), markup);
    let volume = optional(&record.volume, markup);
    let issue = optional(&record.issue, markup);
    let pages = optional(&record.pages, markup);

    match style {
        Style::Apa => format!(
            "{} ({}). {}. {}, {}({}), pp. {}. https://doi.org/{}",
            f.authors,
            f.year,
            f.title,
            emphasis(&journal, markup),
            volume,
            issue,
            pages,
            f.doi
        ),
        Style::Harvard => format!(
            "{}, {}. {}. {}, [e-journal] {}({}), pp. {}. https://doi.org/{}.",
            f.authors,
            f.year,
            f.title,
            emphasis(&journal, markup),
            volume,
            issue,
            pages,
            f.doi
        ),
        Style::Ieee => {
            // Crossref month number as issued, e.g. "3. 2013"
            let date = match record.month {
                Some(month) => format!("{}. {}", month, f.year),
                None => f.year.clone(),
            };
            format!(
                "[{}] {}, \u{201c}{},\u{201d} {}, vol. {}, pp. {}, {}. doi: {}.",
                ref_index, f.authors, f.title, journal, volume, pages, date, f.doi
            )
        }
    }
}

pub(super) fn book(
    record: &BibliographicRecord,
    authors: &str,
    style: Style,
    ref_index: usize,
    markup: CitationMarkup,
) -> String {
    let f = Fields::new(record, authors, markup);
    let publisher = text(record.publisher.as_deref().unwrap_or("Unknown Publisher"), markup);
    let place = text(record.place.as_deref().unwrap_or("Unknown Place"), markup);
    let edition = record.edition.as_deref().map(|e| text(e, markup));

    match style {
        Style::Apa => format!(
            "{} ({}). {}. {}.",
            f.authors,
            f.year,
            emphasis(&f.title, markup),
            publisher
        ),
        Style::Harvard => {
            let edition_part = edition.map(|e| format!(" {}.", e)).unwrap_or_default();
            format!(
                "{}, {}. {}.{} {}: {}.",
                f.authors,
                f.year,
                emphasis(&f.title, markup),
                edition_part,
                place,
                publisher
            )
        }
        Style::Ieee => {
            let edition_part = edition.map(|e| format!(", {}", e)).unwrap_or_default();
            format!(
                "[{}] {}, \u{201c}{}\u{201d}{}, {}: {}, {}.",
                ref_index, f.authors, f.title, edition_part, place, publisher, f.year
            )
        }
    }
}

fn optional(value: &Option<String>, markup: CitationMarkup) -> String {
    value.as_deref().map(|v| text(v, markup)).unwrap_or_default()
}

fn emphasis(value: &str, markup: CitationMarkup) -> String {
    match markup {
        CitationMarkup::Plain => value.to_string(),
        CitationMarkup::Html => format!("<em>{}</em>", value),
    }
}

fn text(value: &str, markup: CitationMarkup) -> String {
    match markup {
        CitationMarkup::Plain => value.to_string(),
        CitationMarkup::Html => escape_html(value),
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
