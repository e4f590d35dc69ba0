//! Letter records and manifest entries
//!
//! A `LetterRecord` is the normalized display form of one yearly letter.
//! It is built either from a `ManifestEntry` or synthesized for a year
//! when the manifest cannot be used.

use serde::{Deserialize, Serialize};

/// First year covered by the catalogue (inclusive)
pub const FIRST_YEAR: i32 = 1977;

/// Last year covered by the catalogue (inclusive)
pub const LAST_YEAR: i32 = 2024;

/// Download locator for every record. Downloads are disabled in this edition.
pub const DISABLED_DOWNLOAD: &str = "#";

/// Summary used when a manifest entry carries none
pub const CANNED_SUMMARY: &str = "Carta anual de Warren Buffett...";

/// One entry of `letters/manifest.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub year: i32,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub path: String,
}

/// Normalized letter metadata shown as a catalogue card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterRecord {
    pub id: String,
    pub year: i32,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub download_url: String,
    pub online_url: String,
}

impl LetterRecord {
    /// Synthesize the record for `year` without any manifest data
    pub fn synthesized(year: i32, language: &str) -> Self {
        Self {
            id: format!("letter-{}", year),
            year,
            title: format!("Carta a los Accionistas {}", year),
            summary: format!(
                "Carta anual de Warren Buffett a los accionistas de Berkshire Hathaway del año {}.",
                year
            ),
            description: None,
            download_url: DISABLED_DOWNLOAD.to_string(),
            online_url: document_locator(language, year),
        }
    }

    /// Long description when present, otherwise the summary
    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.summary)
    }
}

impl From<ManifestEntry> for LetterRecord {
    fn from(entry: ManifestEntry) -> Self {
        let summary = entry
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| CANNED_SUMMARY.to_string());

        Self {
            id: entry.id,
            year: entry.year,
            title: entry.title,
            summary,
            description: entry.description.filter(|d| !d.trim().is_empty()),
            download_url: DISABLED_DOWNLOAD.to_string(),
            online_url: entry.path,
        }
    }
}

/// Resource path of a year's document, relative to the resource base
pub fn document_path(language: &str, year: i32) -> String {
    format!("letters/{}/{}.md", language, year)
}

/// Absolute locator of a year's document, as published in view links
pub fn document_locator(language: &str, year: i32) -> String {
    format!("/{}", document_path(language, year))
}
