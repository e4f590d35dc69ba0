// API Integration Tests
//
// Purpose: drive every route through the router with in-memory letter sources
// Run with: cargo test --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use letters_catalogue::config::AppConfig;
    use async_trait::async_trait;
    use letters_catalogue::letters::{LetterSource, SourceError, StaticSource};
    use letters_catalogue::{create_router, AppState};
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt; // for oneshot

    const MANIFEST: &str = "letters/manifest.json";

    // Helper: Create test app over a given source
    fn create_test_app(source: StaticSource) -> axum::Router {
        let config = AppConfig {
            base: letters_catalogue::ResourceBase::Remote("http://letters.invalid".into()),
            ..AppConfig::default()
        };
        create_router(AppState::with_source(config, Arc::new(source)))
    }

    async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    async fn text_response(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        String::from_utf8(body.to_vec()).expect("Body is not UTF-8")
    }

    // =========================================================================
    // Section 1: Health Check
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let response = get(create_test_app(StaticSource::new()), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    // =========================================================================
    // Section 2: Catalogue
    // =========================================================================

    #[tokio::test]
    async fn test_catalogue_from_single_entry_manifest() {
        let source = StaticSource::new().with_text(
            MANIFEST,
            r#"[{"id":"x","year":2020,"title":"T","path":"/letters/es/2020.md"}]"#,
        );
        let response = get(create_test_app(source), "/api/letters").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["rows"], 1);
        assert_eq!(body["source"], "manifest");
        assert_eq!(body["data"][0]["id"], "x");
        assert_eq!(body["data"][0]["year"], 2020);
        assert_eq!(body["data"][0]["online_url"], "/letters/es/2020.md");
        assert_eq!(body["data"][0]["download_url"], "#");
    }

    #[tokio::test]
    async fn test_catalogue_falls_back_to_generated_years() {
        let response = get(create_test_app(StaticSource::new()), "/api/letters").await;
        let body = json_response(response).await;

        assert_eq!(body["rows"], 48);
        assert_eq!(body["source"], "fallback");

        let data = body["data"].as_array().unwrap();
        for (i, letter) in data.iter().enumerate() {
            let year = 1977 + i as i64;
            assert_eq!(letter["year"], year);
            assert_eq!(letter["id"], format!("letter-{}", year));
            assert_eq!(letter["online_url"], format!("/letters/es/{}.md", year));
        }
    }

    #[tokio::test]
    async fn test_home_page_shows_one_card_per_letter() {
        let source = StaticSource::new().with_text(
            MANIFEST,
            r#"[{"id":"x","year":2020,"title":"T","path":"/letters/es/2020.md"}]"#,
        );
        let response = get(create_test_app(source), "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = text_response(response).await;
        assert_eq!(html.matches("class=\"card\"").count(), 1);
        assert!(html.contains("<span class=\"badge\">2020</span>"));
        assert!(html.contains("href=\"/letter/2020\""));
        assert!(html.contains("<html"));
    }

    #[tokio::test]
    async fn test_home_page_fallback_has_48_cards() {
        let response = get(create_test_app(StaticSource::new().with_status(MANIFEST, 500)), "/").await;
        let html = text_response(response).await;

        assert_eq!(html.matches("class=\"card\"").count(), 48);
        assert!(html.contains("<span class=\"badge\">1977</span>"));
        assert!(html.contains("<span class=\"badge\">2024</span>"));
    }

    #[tokio::test]
    async fn test_htmx_tab_request_returns_fragment_only() {
        let app = create_test_app(StaticSource::new());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/chat")
                    .header("HX-Request", "true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = text_response(response).await;
        assert!(html.trim_start().starts_with("<div id=\"tab-panel\">"));
        assert!(!html.contains("<html"));
        assert!(html.contains("Consultar a Warren Buffett"));
        assert!(!html.contains("class=\"card\""));
    }

    /// Serves a one-entry manifest until `offline` is set, then answers 503
    struct SwitchableSource {
        offline: AtomicBool,
    }

    #[async_trait]
    impl LetterSource for SwitchableSource {
        async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(SourceError::Status {
                    locator: self.locator(path),
                    status: 503,
                });
            }
            Ok(r#"[{"id":"x","year":2020,"title":"T","path":"/letters/es/2020.md"}]"#.into())
        }

        fn locator(&self, path: &str) -> String {
            format!("/{}", path)
        }
    }

    #[tokio::test]
    async fn test_catalogue_is_cached_until_ttl_expires() {
        let source = Arc::new(SwitchableSource {
            offline: AtomicBool::new(false),
        });
        let config = AppConfig {
            base: letters_catalogue::ResourceBase::Remote("http://letters.invalid".into()),
            catalogue_ttl: Duration::from_millis(300),
            ..AppConfig::default()
        };
        let app = create_router(AppState::with_source(config, source.clone()));

        let body = json_response(get(app.clone(), "/api/letters").await).await;
        assert_eq!(body["source"], "manifest");

        // Within the TTL the cached manifest is still served
        source.offline.store(true, Ordering::SeqCst);
        let body = json_response(get(app.clone(), "/api/letters").await).await;
        assert_eq!(body["source"], "manifest");
        assert_eq!(body["rows"], 1);

        tokio::time::sleep(Duration::from_millis(800)).await;

        let body = json_response(get(app, "/api/letters").await).await;
        assert_eq!(body["source"], "fallback");
        assert_eq!(body["rows"], 48);
    }

    // =========================================================================
    // Section 3: Document Viewer
    // =========================================================================

    #[tokio::test]
    async fn test_letter_json_success() {
        let source = StaticSource::new().with_text("letters/es/1999.md", "Hola mundo");
        let response = get(create_test_app(source), "/api/letters/1999").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["content"], "Hola mundo");
        assert_eq!(body["html"], "<p>Hola mundo</p>\n");
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn test_letter_json_failure_reports_status() {
        let source = StaticSource::new().with_status("letters/es/1985.md", 403);
        let response = get(create_test_app(source), "/api/letters/1985").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["status"], "failed");
        assert!(body["error"].as_str().unwrap().contains("403"));
        assert_eq!(body["attempted_path"], "/letters/es/1985.md");
        assert!(body["html"]
            .as_str()
            .unwrap()
            .contains("<h1>Error cargando documento</h1>"));
    }

    #[tokio::test]
    async fn test_letter_page_missing_document() {
        let response = get(create_test_app(StaticSource::new()), "/letter/2030").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = text_response(response).await;
        assert!(html.contains("Documento no encontrado (404)"));
        assert!(html.contains("El documento solicitado no está disponible."));
    }

    #[tokio::test]
    async fn test_letter_page_renders_markdown() {
        let source = StaticSource::new().with_text(
            "letters/es/2008.md",
            "## Resumen\n\n| Año | Cambio |\n|---|---|\n| 2008 | -9,6% |\n",
        );
        let response = get(create_test_app(source), "/letter/2008").await;
        let html = text_response(response).await;

        assert!(html.contains("Carta a los Accionistas 2008"));
        assert!(html.contains("<h2>Resumen</h2>"));
        assert!(html.contains("table-wrap"));
        assert!(!html.contains("role=\"alert\""));
    }

    #[tokio::test]
    async fn test_non_numeric_year_is_rejected() {
        let response = get(create_test_app(StaticSource::new()), "/api/letters/mil").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_response(response).await;
        assert!(body["error"].as_str().unwrap().contains("mil"));
    }

    // =========================================================================
    // Section 4: Directory-backed resources
    // =========================================================================

    #[tokio::test]
    async fn test_directory_base_serves_catalogue_documents_and_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("letters/es")).unwrap();
        std::fs::write(
            dir.path().join("letters/manifest.json"),
            r#"[{"id":"letter-1990","year":1990,"title":"Carta 1990","path":"/letters/es/1990.md"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("letters/es/1990.md"), "Texto de 1990").unwrap();

        let config = AppConfig {
            base: letters_catalogue::ResourceBase::Directory(dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        let state = AppState::new(config).unwrap();
        let app = create_router(state);

        let body = json_response(get(app.clone(), "/api/letters").await).await;
        assert_eq!(body["source"], "manifest");
        assert_eq!(body["rows"], 1);

        let body = json_response(get(app.clone(), "/api/letters/1990").await).await;
        assert_eq!(body["content"], "Texto de 1990");

        // The published locator resolves to the raw file
        let response = get(app, "/letters/es/1990.md").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text_response(response).await, "Texto de 1990");
    }
}
