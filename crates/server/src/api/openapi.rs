//! OpenAPI/Utoipa configuration.

use crate::api::{checks::CHECKS_TAG, health::MISC_TAG};
use crate::result::{CheckKind, CheckRecord};
use utoipa::OpenApi;

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "certwatch API",
        version = "1.0.0",
        description = "TLS certificate and domain registration expiry monitoring."
    ),
    components(schemas(CheckKind, CheckRecord)),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = CHECKS_TAG, description = "On-demand expiry checks")
    )
)]
pub struct ApiDoc;
