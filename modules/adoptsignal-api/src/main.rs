use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use adoptsignal_common::Config;
use adoptsignal_scan::scanner::Scanner;

mod rest;

pub struct AppState {
    pub scanner: Scanner,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("adoptsignal=info".parse()?))
        .init();

    let config = Config::from_env();
    config.log_redacted();

    let scanner = Scanner::from_config(&config)?;
    let state = Arc::new(AppState { scanner });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Scans
        .route("/api/check/{company}", get(rest::api_check))
        .route("/api/scan/{company}", get(rest::api_scan))
        .route("/api/batch", post(rest::api_batch))
        // Raw findings per source
        .route(
            "/api/sources/{source}/{company}",
            get(rest::api_source_findings),
        )
        // Source health
        .route("/api/status", get(rest::api_status))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("Adoption scanner API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
