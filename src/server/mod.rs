//! HTTP API over the workflow orchestrator.

pub mod api;

pub use api::{AppState, SharedState};

use anyhow::{Context, Result};
use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: crate::claimcheck_config::default_allowed_origins(),
        }
    }
}

/// Build the full application router with CORS and request tracing.
pub fn build_router(state: SharedState, allowed_origins: &[String]) -> Router {
    api::api_router()
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Allow-listed origins with credentials; methods and headers are mirrored
/// from the preflight request.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Start the API server and run until Ctrl-C.
pub async fn start_server(state: SharedState, config: &ServerConfig) -> Result<()> {
    if !state.api_configured() {
        warn!("PERPLEXITY_API_KEY not set; /verify will answer 503");
    }

    let app = build_router(state, &config.allowed_origins);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "API server listening");
    println!("claimcheck API running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ResultStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_router(dir: &TempDir) -> Router {
        let state = Arc::new(AppState {
            detector: None,
            store: Arc::new(ResultStore::new(dir.path())),
        });
        build_router(state, &ServerConfig::default().allowed_origins)
    }

    #[tokio::test]
    async fn test_health_via_full_router() {
        let dir = TempDir::new().unwrap();
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = test_router(&dir).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_allows_listed_origin() {
        let dir = TempDir::new().unwrap();
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/verify")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let resp = test_router(&dir).oneshot(req).await.unwrap();
        let headers = resp.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn test_cors_ignores_unlisted_origin() {
        let dir = TempDir::new().unwrap();
        let req = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let resp = test_router(&dir).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
