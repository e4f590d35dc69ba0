//! Application configuration
//!
//! Read from environment variables at startup:
//!
//! | variable             | default  |
//! |----------------------|----------|
//! | `LETTERS_BASE`       | `public` |
//! | `LETTERS_LANG`       | `es`     |
//! | `PORT`               | `3000`   |
//! | `CATALOGUE_TTL_SECS` | `300`    |
//! | `FETCH_TIMEOUT_SECS` | `10`     |
//!
//! A base starting with `http://` or `https://` is fetched over HTTP;
//! anything else is a local directory.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::letters::{DirSource, HttpSource, LetterSource, SourceError};

/// Link for the full project, downloads and the chat feature
pub const SUPPORT_URL: &str =
    "https://buymeacoffee.com/buffettletters/proyecto-abierto-buffett-letters";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceBase {
    Remote(String),
    Directory(PathBuf),
}

impl ResourceBase {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ResourceBase::Remote(raw.to_string())
        } else {
            ResourceBase::Directory(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for ResourceBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceBase::Remote(url) => write!(f, "{}", url),
            ResourceBase::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base: ResourceBase,
    pub language: String,
    pub port: u16,
    pub catalogue_ttl: Duration,
    pub fetch_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base: ResourceBase::Directory(PathBuf::from("public")),
            language: "es".to_string(),
            port: 3000,
            catalogue_ttl: Duration::from_secs(300),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup("LETTERS_BASE") {
            if base.trim().is_empty() {
                return Err(ConfigError::Empty("LETTERS_BASE"));
            }
            config.base = ResourceBase::parse(base.trim());
        }

        if let Some(language) = lookup("LETTERS_LANG") {
            if language.trim().is_empty() {
                return Err(ConfigError::Empty("LETTERS_LANG"));
            }
            config.language = language.trim().to_string();
        }

        if let Some(port) = parse_var::<u16, _>(&lookup, "PORT")? {
            config.port = port;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "CATALOGUE_TTL_SECS")? {
            config.catalogue_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Source matching the configured base
    pub fn letter_source(&self) -> Result<Arc<dyn LetterSource>, SourceError> {
        let source: Arc<dyn LetterSource> = match &self.base {
            ResourceBase::Remote(url) => Arc::new(HttpSource::new(url.clone(), self.fetch_timeout)?),
            ResourceBase::Directory(dir) => Arc::new(DirSource::new(dir.clone())),
        };
        Ok(source)
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
