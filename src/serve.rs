//! Static file server for the built site.
//!
//! Serves the output directory as-is. There is no watching or rebuild;
//! run `docsite build` again and refresh.

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::CliError;

pub fn router(site_dir: &Path) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(ServeDir::new(site_dir).append_index_html_on_directories(true))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(site_dir: &Path, port: u16) -> Result<(), CliError> {
    let addr = format!("0.0.0.0:{port}");
    let listener =
        tokio::net::TcpListener::bind(&addr).await.map_err(|source| CliError::Bind { addr: addr.clone(), source })?;

    tracing::info!(%port, dir = %site_dir.display(), "docsite listening");
    axum::serve(listener, router(site_dir)).with_graceful_shutdown(shutdown_signal()).await.map_err(CliError::Serve)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutting down"),
        Err(err) => {
            tracing::warn!(error = %err, "ctrl-c handler unavailable, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
#[path = "serve_test.rs"]
mod tests;
