use std::time::Duration;
use thiserror::Error;

/// Why a single probe failed. The `Display` form is `"<Category>: <message>"` and is what
/// ends up in the failed result's `error` field.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Timeout: {stage} timed out after {after:?}")]
    Timeout { stage: &'static str, after: Duration },
    #[error("Connect: {0}")]
    Connect(String),
    #[error("Tls: {0}")]
    Tls(String),
    #[error("Certificate: no usable certificate chain")]
    NoUsableCertificate,
    #[error("Rdap: no RDAP server known for {0}")]
    NoRdapServer(String),
    #[error("Rdap: {0}")]
    Rdap(String),
    #[error("Http: status {status} from {url}")]
    Http { status: u16, url: String },
    #[error("Json: {0}")]
    Json(String),
    #[error("Domain: no expiration event present")]
    NoExpirationEvent,
    #[error("Domain: date parse failure for {0:?}")]
    DateParse(String),
    #[error("Internal: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeError::Rdap(format!("request timed out: {e}"))
        } else if e.is_decode() {
            ProbeError::Json(e.to_string())
        } else if e.is_connect() {
            ProbeError::Connect(e.to_string())
        } else {
            ProbeError::Rdap(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Notification endpoint answered HTTP {0}")]
    Status(u16),
}
