//! HTTP server for the live dashboard.
//!
//! Every request re-runs the whole pipeline (load, clean, aggregate,
//! render) against the CSV on disk, so edits to the file show up on the
//! next page load.

use crate::analysis::{build_dashboard, DashboardOptions};
use crate::loader::load_catalog;
use crate::models::{Dashboard, Theme};
use crate::report::{render_html, HtmlOptions};
use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Immutable settings shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub input: PathBuf,
    pub title: String,
    pub top_n: usize,
    pub default_theme: Theme,
}

impl AppState {
    fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            title: self.title.clone(),
            source: self.input.display().to_string(),
            top_n: self.top_n,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    theme: Option<Theme>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Error returned when the dashboard cannot be built.
struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!("Dashboard build failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to build dashboard: {:#}", self.0),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

/// Load the CSV and build the dashboard off the async runtime.
async fn rebuild(state: &AppState) -> Result<Dashboard> {
    let input = state.input.clone();
    let options = state.dashboard_options();

    tokio::task::spawn_blocking(move || -> Result<Dashboard> {
        let catalog = load_catalog(&input)?;
        Ok(build_dashboard(&catalog, &options))
    })
    .await
    .context("Dashboard task panicked")?
}

async fn dashboard_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, ServerError> {
    let dashboard = rebuild(&state).await?;
    let options = HtmlOptions {
        theme: query.theme.unwrap_or(state.default_theme),
        live: true,
    };
    Ok(Html(render_html(&dashboard, options)))
}

async fn dashboard_json(State(state): State<Arc<AppState>>) -> Result<Json<Dashboard>, ServerError> {
    Ok(Json(rebuild(&state).await?))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/dashboard", get(dashboard_json))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving dashboard on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const CSV: &str = "show_id,type,title,director,country,date_added,listed_in\n\
s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,United States,\"September 25, 2021\",Documentaries\n\
s2,TV Show,Blood & Water,,South Africa,\"September 24, 2021\",\"International TV Shows, TV Dramas\"\n";

    fn test_state(dir: &TempDir) -> AppState {
        let input = dir.path().join("titles.csv");
        std::fs::write(&input, CSV).unwrap();
        AppState {
            input,
            title: "Test Dashboard".to_string(),
            top_n: 10,
            default_theme: Theme::Dark,
        }
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get(router(test_state(&dir)), "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_dashboard_page() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get(router(test_state(&dir)), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Test Dashboard"));
        assert!(body.contains("theme-dark"));
        assert!(body.contains("Blood &amp; Water"));
    }

    #[tokio::test]
    async fn test_dashboard_page_theme_query() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get(router(test_state(&dir)), "/?theme=light").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<body class="theme-light" data-live="true">"#));
    }

    #[tokio::test]
    async fn test_dashboard_json() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get(router(test_state(&dir)), "/api/dashboard").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["metrics"]["total_titles"], 2);
        assert_eq!(json["metrics"]["total_movies"], 1);
        assert_eq!(json["metrics"]["total_tv_shows"], 1);
        assert_eq!(json["top_genres"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_server_error() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        state.input = dir.path().join("missing.csv");

        let (status, body) = get(router(state), "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("missing.csv"));
    }
}
