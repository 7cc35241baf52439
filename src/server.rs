//! Relay HTTP Server
//!
//! ```text
//! Browser / client
//!  └── POST /api/generate {type, payload}   (any path falls back to the relay)
//!       └── genai-relay  (+ ?key=<secret>)
//!            ├── text  → models/gemini-2.0-flash:generateContent
//!            └── image → models/imagen-3.0-generate-002:predict
//! ```
//!
//! Every response carries the permissive CORS headers, including the
//! preflight answer, `/health`, and errors produced by the layers.

use crate::config::RelayConfig;
use crate::relay::{handle, RelayState};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue,
    },
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Path the relay was originally served from
pub const GENERATE_PATH: &str = "/api/generate";

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "POST, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

pub async fn health_check() -> &'static str {
    "OK"
}

/// Build the application router around shared state
pub fn build_router(state: Arc<RelayState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route(GENERATE_PATH, any(handle))
        .fallback(handle)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(CORS_ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        .with_state(state)
}

/// Bind and serve until Ctrl+C
pub async fn run_server(config: RelayConfig, host: &str, port: u16) -> anyhow::Result<()> {
    if !config.has_api_key() {
        warn!("Upstream API key is not set; POST requests will fail with 500 until it is configured");
    }

    let upstream_base = config.upstream_base.clone();
    let key_status = if config.has_api_key() { "configured" } else { "MISSING" };

    let state = Arc::new(RelayState::new(config)?);
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("╔══════════════════════════════════════════════════════════════╗");
    info!("║              Generative AI Relay                             ║");
    info!("╠══════════════════════════════════════════════════════════════╣");
    info!("║  Listening on: {:46} ║", addr);
    info!("║  Upstream:     {:46} ║", upstream_base);
    info!("║  API key:      {:46} ║", key_status);
    info!("╠══════════════════════════════════════════════════════════════╣");
    info!("║  Endpoints:                                                  ║");
    info!("║    POST    /api/generate - Relay text/image generation       ║");
    info!("║    OPTIONS /api/generate - CORS preflight                    ║");
    info!("║    GET     /health       - Health check                      ║");
    info!("╚══════════════════════════════════════════════════════════════╝");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header::ALLOW, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn router(config: RelayConfig) -> Router {
        build_router(Arc::new(RelayState::new(config).unwrap()))
    }

    fn assert_cors(response: &axum::response::Response) {
        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], CORS_ALLOW_ORIGIN);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], CORS_ALLOW_METHODS);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], CORS_ALLOW_HEADERS);
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = router(RelayConfig::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_preflight_on_any_path() {
        for path in [GENERATE_PATH, "/", "/anything/else"] {
            let response = router(RelayConfig::default())
                .oneshot(
                    Request::builder()
                        .method(Method::OPTIONS)
                        .uri(path)
                        .header("origin", "https://example.com")
                        .header("access-control-request-method", "POST")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "path {}", path);
            assert_cors(&response);
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn test_get_on_relay_is_method_not_allowed() {
        let response = router(RelayConfig::default())
            .oneshot(Request::get(GENERATE_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "POST");
        assert_cors(&response);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Method Not Allowed");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = RelayConfig::default().with_api_key("test-key");
        config.max_body_bytes = 64;

        let payload = "x".repeat(256);
        let body = format!(r#"{{"type":"text","payload":{{"text":"{}"}}}}"#, payload);

        let response = router(config)
            .oneshot(
                Request::post(GENERATE_PATH)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_cors(&response);
    }
}
