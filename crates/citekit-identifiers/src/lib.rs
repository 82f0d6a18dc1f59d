// Allow manual modulo checks since .is_multiple_of() is nightly-only
#![allow(clippy::manual_is_multiple_of)]

//! Identifier classification for citation lookups
//!
//! Decides whether a raw input string is a DOI, an ISBN, or neither, and
//! normalizes it for metadata lookup:
//! - DOI URL prefix stripping (`https://doi.org/`, `http://dx.doi.org/`, ...)
//! - ISBN-10 / ISBN-13 shape detection with hyphen and space removal
//! - ISBN checksum validation (informational only, never used to reject)

pub mod classifier;
pub mod validators;

pub use classifier::*;
pub use validators::*;
