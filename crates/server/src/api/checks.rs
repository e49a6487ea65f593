//! On-demand check endpoints.
//!
//! - `/certificates/check` - TLS certificate expiry for every configured target
//! - `/domains/check` - Domain registration expiry for every configured target

use crate::result::{CheckKind, CheckRecord, CheckResult};
use crate::service::CheckService;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const CHECKS_TAG: &str = "Expiry Checks";

pub fn router(service: Arc<CheckService>) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(check_certificates))
        .routes(routes!(check_domains))
        .with_state(service)
}

#[tracing::instrument(skip(service))]
#[utoipa::path(
    post,
    path = "/certificates/check",
    tag = CHECKS_TAG,
    operation_id = "Check Certificates",
    summary = "Run a certificate expiry check now",
    description = "Probes every configured target over TLS and returns one record per target, \
                   soonest expiry first and failures last. Alerts are sent for results within the \
                   configured threshold when Telegram is configured.",
    responses(
        (status = 200, description = "Sorted check records", body = [CheckRecord], content_type = "application/json"),
        (status = 500, description = "The check run did not complete")
    )
)]
async fn check_certificates(
    State(service): State<Arc<CheckService>>,
) -> Result<Json<Vec<CheckResult>>, StatusCode> {
    run_detached(service, CheckKind::Certificate).await
}

#[tracing::instrument(skip(service))]
#[utoipa::path(
    post,
    path = "/domains/check",
    tag = CHECKS_TAG,
    operation_id = "Check Domains",
    summary = "Run a domain registration expiry check now",
    description = "Looks up every configured target's registration expiry over RDAP and returns one \
                   record per target, soonest expiry first and failures last.",
    responses(
        (status = 200, description = "Sorted check records", body = [CheckRecord], content_type = "application/json"),
        (status = 500, description = "The check run did not complete")
    )
)]
async fn check_domains(
    State(service): State<Arc<CheckService>>,
) -> Result<Json<Vec<CheckResult>>, StatusCode> {
    run_detached(service, CheckKind::Domain).await
}

/// Run on its own task so a client disconnect cannot cut the alert phase short.
async fn run_detached(
    service: Arc<CheckService>,
    kind: CheckKind,
) -> Result<Json<Vec<CheckResult>>, StatusCode> {
    tokio::spawn(async move { service.run(kind).await })
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(
                name = "api.checks.run_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                kind = %kind,
                error = %e,
                message = "Check run task did not complete"
            );
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
