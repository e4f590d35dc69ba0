// Axum API Server Module
//
// Purpose: serve the letters catalogue and per-year documents as HTML pages
// (askama + htmx) and as a JSON API

#[cfg(feature = "api")]
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

#[cfg(feature = "api")]
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer};

#[cfg(feature = "api")]
use moka::future::Cache;

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use crate::config::{AppConfig, ResourceBase};

#[cfg(feature = "api")]
use crate::letters::{Catalogue, CatalogueLoader, DocumentOutcome, DocumentViewer, LetterSource};

#[cfg(feature = "api")]
use crate::markdown::render_markdown;

#[cfg(feature = "api")]
use crate::web::handlers::pages;

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
const CATALOGUE_KEY: &str = "catalogue";

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub source: Arc<dyn LetterSource>,
    pub loader: Arc<CatalogueLoader>,
    /// Single-entry cache; expiry re-runs the loader
    pub cache: Cache<&'static str, Arc<Catalogue>>,
}

#[cfg(feature = "api")]
impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        tracing::info!("Initializing letter source for {}...", config.base);
        let source = config.letter_source()?;
        Ok(Self::with_source(config, source))
    }

    /// State over an explicit source (embedding, tests)
    pub fn with_source(config: AppConfig, source: Arc<dyn LetterSource>) -> Self {
        let loader = Arc::new(CatalogueLoader::new(source.clone(), config.language.clone()));

        tracing::info!("Initializing Moka cache (ttl {:?})...", config.catalogue_ttl);
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.catalogue_ttl)
            .build();

        Self {
            config: Arc::new(config),
            source,
            loader,
            cache,
        }
    }

    /// Current catalogue, loading it on first use or after expiry.
    /// Concurrent callers share a single load.
    pub async fn catalogue(&self) -> Arc<Catalogue> {
        if let Some(cached) = self.cache.get(CATALOGUE_KEY).await {
            tracing::debug!("Cache hit for catalogue");
            return cached;
        }

        let loader = self.loader.clone();
        self.cache
            .get_with(CATALOGUE_KEY, async move { Arc::new(loader.load().await) })
            .await
    }

    /// Fetch one year's document. A fresh viewer per request: server requests
    /// never share display state.
    pub async fn document(&self, year: i32) -> DocumentOutcome {
        DocumentViewer::new(self.source.clone(), self.config.language.clone())
            .open(year)
            .await
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(health_check))

        // HTML pages
        .route("/", get(pages::home_page))
        .route("/chat", get(pages::chat_page))
        .route("/letter/:year", get(pages::letter_page))

        // JSON API
        .route("/api/letters", get(list_letters))
        .route("/api/letters/:year", get(get_letter));

    // Published view locators point at /letters/{lang}/{year}.md
    if let ResourceBase::Directory(dir) = &state.config.base {
        router = router.nest_service("/letters", ServeDir::new(dir.join("letters")));
    }

    router
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn list_letters(State(state): State<AppState>) -> Json<serde_json::Value> {
    let catalogue = state.catalogue().await;

    Json(serde_json::json!({
        "rows": catalogue.len(),
        "source": catalogue.origin,
        "data": catalogue.letters,
    }))
}

#[cfg(feature = "api")]
async fn get_letter(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let year = parse_year(&year)?;
    let outcome = state.document(year).await;
    let html = render_markdown(outcome.content());

    let (status, error, attempted_path) = match &outcome {
        DocumentOutcome::Ready { .. } => ("ready", None, None),
        DocumentOutcome::Failed {
            error,
            attempted_path,
            ..
        } => ("failed", Some(error.as_str()), Some(attempted_path.as_str())),
    };

    Ok(Json(serde_json::json!({
        "year": year,
        "status": status,
        "content": outcome.content(),
        "html": html,
        "error": error,
        "attempted_path": attempted_path,
    })))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Year path segment as an integer; other values are a client error
#[cfg(feature = "api")]
pub(crate) fn parse_year(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Año no válido: {}", raw)))
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
