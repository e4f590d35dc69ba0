// Page handlers for HTML rendering with Askama

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum_htmx::HxRequest;
use askama::Template;
use chrono::Datelike;

use crate::api_server::{parse_year, AppError, AppState};
use crate::config::SUPPORT_URL;
use crate::letters::{DocumentOutcome, LetterRecord};
use crate::markdown::render_markdown;

const SITE_TITLE: &str = "Cartas de Warren Buffett (ES) - DEMO";

// ============================================================================
// Home Page (documents / chat tabs)
// ============================================================================

/// One catalogue card
pub struct LetterCard {
    pub year: i32,
    pub description: String,
}

impl From<&LetterRecord> for LetterCard {
    fn from(letter: &LetterRecord) -> Self {
        Self {
            year: letter.year,
            description: letter.display_description().to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub support_url: &'static str,
    pub current_year: i32,
    pub docs_active: bool,
    pub letters: Vec<LetterCard>,
}

/// Tab bar plus active tab content, swapped in by htmx
#[derive(Template)]
#[template(path = "partials/tab_panel.html")]
pub struct TabPanelTemplate {
    pub support_url: &'static str,
    pub docs_active: bool,
    pub letters: Vec<LetterCard>,
}

pub async fn home_page(state: State<AppState>, hx: HxRequest) -> Response {
    render_home(state, hx, true).await
}

pub async fn chat_page(state: State<AppState>, hx: HxRequest) -> Response {
    render_home(state, hx, false).await
}

async fn render_home(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    docs_active: bool,
) -> Response {
    // The chat tab is static; only the documents tab needs the catalogue
    let letters = if docs_active {
        state.catalogue().await.letters.iter().map(LetterCard::from).collect()
    } else {
        Vec::new()
    };

    let rendered = if is_htmx {
        TabPanelTemplate {
            support_url: SUPPORT_URL,
            docs_active,
            letters,
        }
        .render()
    } else {
        HomeTemplate {
            title: SITE_TITLE.to_string(),
            support_url: SUPPORT_URL,
            current_year: chrono::Utc::now().year(),
            docs_active,
            letters,
        }
        .render()
    };

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => AppError::Internal(format!("Template error: {}", e)).into_response(),
    }
}

// ============================================================================
// Letter Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/letter.html")]
pub struct LetterTemplate {
    pub title: String,
    pub support_url: &'static str,
    pub current_year: i32,
    pub year: i32,
    pub error: Option<String>,
    pub attempted_path: Option<String>,
    pub body_html: String,
}

impl LetterTemplate {
    fn from_outcome(outcome: &DocumentOutcome) -> Self {
        let (error, attempted_path) = match outcome {
            DocumentOutcome::Ready { .. } => (None, None),
            DocumentOutcome::Failed {
                error,
                attempted_path,
                ..
            } => (Some(error.clone()), Some(attempted_path.clone())),
        };

        Self {
            title: format!("Carta a los Accionistas {}", outcome.year()),
            support_url: SUPPORT_URL,
            current_year: chrono::Utc::now().year(),
            year: outcome.year(),
            error,
            attempted_path,
            body_html: render_markdown(outcome.content()),
        }
    }
}

pub async fn letter_page(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Html<String>, AppError> {
    let year = parse_year(&year)?;
    let outcome = state.document(year).await;

    LetterTemplate::from_outcome(&outcome)
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template error: {}", e)))
}
