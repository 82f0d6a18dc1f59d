//! Bibliographic domain types shared by the citekit crates
//!
//! - BibliographicRecord: normalized metadata for an article (DOI) or book (ISBN)
//! - Author: structured (family/given) or flat (raw name) author
//! - Style: the supported citation styles (APA, Harvard, IEEE)
//! - CitationResult: formatted output for one identifier
//! - CacheKey: (identifier, type) key into the metadata cache

pub mod author;
pub mod citation;
pub mod record;
pub mod style;
pub mod validation;

pub use author::*;
pub use citation::*;
pub use record::*;
pub use style::*;
pub use validation::*;
