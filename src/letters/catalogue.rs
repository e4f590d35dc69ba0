//! Catalogue Loader
//!
//! Loads `letters/manifest.json` once and maps every entry to a
//! `LetterRecord`, preserving manifest order. Any failure (transport,
//! status, malformed body, duplicate ids) discards the manifest as a whole
//! and the catalogue falls back to one synthesized record per year in
//! `FIRST_YEAR..=LAST_YEAR`. There is no retry.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use super::record::{LetterRecord, ManifestEntry, FIRST_YEAR, LAST_YEAR};
use super::source::{LetterSource, SourceError};

pub const MANIFEST_PATH: &str = "letters/manifest.json";

/// Why the manifest could not be used
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest unavailable: {0}")]
    Unavailable(#[from] SourceError),

    #[error("manifest is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("manifest repeats letter id {0:?}")]
    DuplicateId(String),
}

/// Where the records of a catalogue came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogueOrigin {
    Manifest,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalogue {
    pub origin: CatalogueOrigin,
    pub letters: Vec<LetterRecord>,
}

impl Catalogue {
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

pub struct CatalogueLoader {
    source: Arc<dyn LetterSource>,
    language: String,
}

impl CatalogueLoader {
    pub fn new(source: Arc<dyn LetterSource>, language: impl Into<String>) -> Self {
        Self {
            source,
            language: language.into(),
        }
    }

    /// Load the catalogue. Never fails: a bad manifest yields the fallback.
    pub async fn load(&self) -> Catalogue {
        match self.fetch_manifest().await {
            Ok(entries) => {
                tracing::info!("Loaded {} letters from manifest", entries.len());
                Catalogue {
                    origin: CatalogueOrigin::Manifest,
                    letters: entries.into_iter().map(LetterRecord::from).collect(),
                }
            }
            Err(e) => {
                tracing::warn!("{}; using generated catalogue", e);
                Catalogue {
                    origin: CatalogueOrigin::Fallback,
                    letters: fallback_letters(&self.language),
                }
            }
        }
    }

    /// Fetch and validate the manifest without falling back
    pub async fn fetch_manifest(&self) -> Result<Vec<ManifestEntry>, ManifestError> {
        let body = self.source.fetch_text(MANIFEST_PATH).await?;
        parse_manifest(&body)
    }
}

/// Parse a manifest body, rejecting it whole if any entry is unusable
pub fn parse_manifest(body: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let entries: Vec<ManifestEntry> = serde_json::from_str(body)?;

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in &entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(ManifestError::DuplicateId(entry.id.clone()));
        }
    }

    Ok(entries)
}

/// One synthesized record per year, ascending
pub fn fallback_letters(language: &str) -> Vec<LetterRecord> {
    (FIRST_YEAR..=LAST_YEAR)
        .map(|year| LetterRecord::synthesized(year, language))
        .collect()
}
