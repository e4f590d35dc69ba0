//! Letters Catalogue
//!
//! Serves a catalogue of yearly shareholder letters (Spanish edition) and a
//! per-year Markdown document view.
//!
//! - `letters/`: records, sources, catalogue loader, document viewer
//! - `markdown`: GFM Markdown to HTML
//! - `config`: environment-driven configuration
//! - `api_server` + `web/`: axum router, JSON API and askama pages (`api` feature)

pub mod config;
pub mod letters;
pub mod markdown;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use config::{AppConfig, ResourceBase};
pub use letters::{Catalogue, CatalogueLoader, DocumentOutcome, DocumentViewer, LetterRecord};
pub use markdown::render_markdown;

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
