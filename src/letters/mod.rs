//! Letters: catalogue loading and document viewing
//!
//! - `record`: `LetterRecord` / `ManifestEntry` and locator helpers
//! - `source`: where text comes from (HTTP, directory, in-memory)
//! - `catalogue`: manifest-or-fallback catalogue loader
//! - `viewer`: per-year document fetch with stale-response protection

pub mod catalogue;
pub mod record;
pub mod source;
pub mod viewer;

pub use catalogue::{Catalogue, CatalogueLoader, CatalogueOrigin, ManifestError};
pub use record::{LetterRecord, ManifestEntry, FIRST_YEAR, LAST_YEAR};
pub use source::{DirSource, HttpSource, LetterSource, SourceError, StaticSource};
pub use viewer::{DocumentOutcome, DocumentViewer, ViewerState};
