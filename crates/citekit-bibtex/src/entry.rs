//! BibTeX entry data structures

/// BibTeX entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BibTeXEntryType {
    Article,
    Book,
}

impl BibTeXEntryType {
    /// Convert entry type to canonical string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
        }
    }
}

/// A single BibTeX field (key-value pair)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXField {
    pub key: String,
    pub value: String,
}

/// A BibTeX entry ready for formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXEntry {
    pub cite_key: String,
    pub entry_type: BibTeXEntryType,
    pub fields: Vec<BibTeXField>,
}

impl BibTeXEntry {
    /// Create a new BibTeX entry
    pub fn new(cite_key: String, entry_type: BibTeXEntryType) -> Self {
        Self {
            cite_key,
            entry_type,
            fields: Vec::new(),
        }
    }

    /// Add a field to the entry
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(BibTeXField {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Add a field only when the value is present and non-blank
    pub fn add_optional_field(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.add_field(key, value);
        }
    }

    /// Get a field value by key (case-insensitive)
    #[cfg(test)]
    pub(crate) fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key.eq_ignore_ascii_case(key))
            .map(|f| f.value.as_str())
    }
}
