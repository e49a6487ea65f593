//! HTTP API.
//!
//! - `checks` - On-demand check endpoints (/api/*)
//! - `health` - Health check endpoint (/healthz)
//! - `openapi` - OpenAPI/Utoipa configuration

pub mod checks;
pub mod health;
pub mod openapi;

pub use checks::CHECKS_TAG;
pub use health::MISC_TAG;

use crate::service::CheckService;
use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

/// The full application router, including the `/api-docs` Redoc page.
pub fn router(service: Arc<CheckService>) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .nest("/api", checks::router(service))
        .routes(routes!(health::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .split_for_parts();

    router.merge(Redoc::with_url("/api-docs", api))
}

/// Bind `bind_address` and serve the API until the process stops.
#[tracing::instrument(skip(service))]
pub async fn start_webserver(service: Arc<CheckService>, bind_address: &str) -> color_eyre::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!(
        name = "api.server.listening",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        addr = %listener.local_addr()?,
        message = "Server running"
    );
    axum::serve(listener, router(service))
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
