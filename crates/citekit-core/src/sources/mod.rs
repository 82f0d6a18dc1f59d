//! Metadata providers: Crossref for DOIs, Open Library for ISBNs

pub mod crossref;
pub mod openlibrary;
pub mod traits;

pub use crossref::*;
pub use openlibrary::*;
pub use traits::*;
