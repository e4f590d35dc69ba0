//! Letter Sources
//!
//! Where manifest and document text come from. Paths handed to a source are
//! relative to its base (e.g. `letters/manifest.json`).
//!
//! - `HttpSource`: remote base URL, fetched with reqwest
//! - `DirSource`: local directory, read with tokio::fs
//! - `StaticSource`: in-memory map, for embedding and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The resource answered with a non-success status
    #[error("{locator} returned status {status}")]
    Status { locator: String, status: u16 },

    #[error("request to {locator} failed: {source}")]
    Transport {
        locator: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading {locator} failed: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// HTTP-equivalent status, when the failure carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Text resource provider rooted at a base locator
#[async_trait]
pub trait LetterSource: Send + Sync {
    /// Fetch the resource at `path` as text, in a single attempt
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError>;

    /// Full locator for `path`, shown to users when a fetch fails
    fn locator(&self, path: &str) -> String;
}

// ============================================================================
// HTTP
// ============================================================================

pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport {
                locator: base_url.clone(),
                source: e,
            })?;
        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl LetterSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        let locator = self.locator(path);
        tracing::debug!("GET {}", locator);

        let response = self
            .client
            .get(&locator)
            .send()
            .await
            .map_err(|e| SourceError::Transport {
                locator: locator.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                locator,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| SourceError::Transport {
            locator,
            source: e,
        })
    }

    fn locator(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// ============================================================================
// Local directory
// ============================================================================

pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl LetterSource for DirSource {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        let locator = self.locator(path);
        let full = self.root.join(path.trim_start_matches('/'));

        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(text),
            // A missing file behaves like a 404 so both sources report alike
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SourceError::Status {
                locator,
                status: 404,
            }),
            Err(e) => Err(SourceError::Io { locator, source: e }),
        }
    }

    fn locator(&self, path: &str) -> String {
        self.root
            .join(path.trim_start_matches('/'))
            .display()
            .to_string()
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Fixed set of resources. Unknown paths answer 404.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: HashMap<String, Result<String, u16>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, path: &str, text: impl Into<String>) -> Self {
        self.entries.insert(path.to_string(), Ok(text.into()));
        self
    }

    pub fn with_status(mut self, path: &str, status: u16) -> Self {
        self.entries.insert(path.to_string(), Err(status));
        self
    }
}

#[async_trait]
impl LetterSource for StaticSource {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        match self.entries.get(path.trim_start_matches('/')) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(status)) => Err(SourceError::Status {
                locator: self.locator(path),
                status: *status,
            }),
            None => Err(SourceError::Status {
                locator: self.locator(path),
                status: 404,
            }),
        }
    }

    fn locator(&self, path: &str) -> String {
        format!("/{}", path.trim_start_matches('/'))
    }
}
