//! Document Viewer
//!
//! Fetches one year's letter as raw Markdown text. Each `open` moves the
//! viewer through `Idle -> Loading -> Ready | Failed`. Requests carry a
//! generation ticket: a response is committed only while its ticket is the
//! newest one issued, so a slow response for an older year is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use super::record::document_path;
use super::source::{LetterSource, SourceError};

/// Body shown in place of a document that could not be loaded
pub const UNAVAILABLE_CONTENT: &str =
    "# Error cargando documento\n\nEl documento solicitado no está disponible.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Ready {
        year: i32,
        content: String,
    },
    Failed {
        year: i32,
        error: String,
        content: String,
        attempted_path: String,
    },
}

impl DocumentOutcome {
    pub fn year(&self) -> i32 {
        match self {
            DocumentOutcome::Ready { year, .. } | DocumentOutcome::Failed { year, .. } => *year,
        }
    }

    /// Markdown to display, the placeholder when the fetch failed
    pub fn content(&self) -> &str {
        match self {
            DocumentOutcome::Ready { content, .. } | DocumentOutcome::Failed { content, .. } => {
                content
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DocumentOutcome::Ready { .. } => None,
            DocumentOutcome::Failed { error, .. } => Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerState {
    Idle,
    Loading { year: i32 },
    Done(DocumentOutcome),
}

/// Handle for one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    year: i32,
}

impl Ticket {
    pub fn year(&self) -> i32 {
        self.year
    }
}

pub struct DocumentViewer {
    source: Arc<dyn LetterSource>,
    language: String,
    generation: AtomicU64,
    state: Mutex<ViewerState>,
}

impl DocumentViewer {
    pub fn new(source: Arc<dyn LetterSource>, language: impl Into<String>) -> Self {
        Self {
            source,
            language: language.into(),
            generation: AtomicU64::new(0),
            state: Mutex::new(ViewerState::Idle),
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resource path for `year`, derived from the year alone
    pub fn path_for(&self, year: i32) -> String {
        document_path(&self.language, year)
    }

    /// Start a request for `year`, superseding any request still in flight
    pub fn begin(&self, year: i32) -> Ticket {
        // Bump under the state lock so the newest ticket always owns the state
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = ViewerState::Loading { year };
        Ticket { generation, year }
    }

    /// Turn a fetch result into an outcome and commit it if `ticket` is still
    /// current. Returns the outcome and whether it was committed.
    pub fn complete(
        &self,
        ticket: Ticket,
        result: Result<String, SourceError>,
    ) -> (DocumentOutcome, bool) {
        let outcome = match result {
            Ok(content) => DocumentOutcome::Ready {
                year: ticket.year,
                content,
            },
            Err(e) => {
                let error = describe_failure(&e);
                tracing::warn!("Letter {} unavailable: {}", ticket.year, e);
                DocumentOutcome::Failed {
                    year: ticket.year,
                    error,
                    content: UNAVAILABLE_CONTENT.to_string(),
                    attempted_path: self.source.locator(&self.path_for(ticket.year)),
                }
            }
        };

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.generation.load(Ordering::SeqCst) == ticket.generation;
        if current {
            *state = ViewerState::Done(outcome.clone());
        } else {
            tracing::debug!("Dropping stale response for letter {}", ticket.year);
        }
        (outcome, current)
    }

    /// Fetch `year` in one attempt. The returned outcome belongs to this
    /// request; `state()` reflects it only if no newer `open` started.
    pub async fn open(&self, year: i32) -> DocumentOutcome {
        let ticket = self.begin(year);
        let result = self.source.fetch_text(&self.path_for(year)).await;
        self.complete(ticket, result).0
    }
}

/// Human-readable failure text shown in the error panel
fn describe_failure(error: &SourceError) -> String {
    match error.status() {
        Some(status) => format!("Documento no encontrado ({})", status),
        None => error.to_string(),
    }
}
