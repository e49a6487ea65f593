//! Minimal RDAP client: IANA bootstrap lookup and domain queries.

use crate::config::RdapConfig;
use crate::error::ProbeError;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

const USER_AGENT: &str = concat!("certwatch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapDomain {
    #[serde(default)]
    pub events: Vec<RdapEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapEvent {
    pub event_action: String,
    #[serde(default)]
    pub event_date: Option<String>,
}

impl RdapDomain {
    /// First event whose action is `expiration`, compared case-insensitively.
    pub fn expiration_event(&self) -> Option<&RdapEvent> {
        self.events
            .iter()
            .find(|e| e.event_action.eq_ignore_ascii_case("expiration"))
    }
}

#[derive(Deserialize)]
struct BootstrapResponse {
    services: Vec<(Vec<String>, Vec<String>)>,
}

/// TLD (lowercase) -> RDAP base URL.
type BootstrapTable = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct RdapClient {
    http: reqwest::Client,
    base_url: Option<String>,
    bootstrap_url: String,
    bootstrap: Arc<OnceCell<BootstrapTable>>,
}

impl RdapClient {
    pub fn new(config: &RdapConfig) -> Result<Self, ProbeError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProbeError::Rdap(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            bootstrap_url: config.bootstrap_url.clone(),
            bootstrap: Arc::new(OnceCell::new()),
        })
    }

    /// Query `domain` and return the decoded RDAP domain object.
    #[tracing::instrument(name = "rdap_lookup_domain", level = "debug", skip(self, timeout))]
    pub async fn lookup_domain(
        &self,
        domain: &str,
        timeout: Duration,
    ) -> Result<RdapDomain, ProbeError> {
        let domain = normalize_domain(domain);
        let base_url = self.base_url_for(&domain, timeout).await?;
        let url = format!("{}domain/{}", ensure_trailing_slash(&base_url), domain);
        tracing::debug!(url = %url, "Querying RDAP");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/rdap+json")
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ProbeError::Json(e.to_string()))
    }

    async fn base_url_for(&self, domain: &str, timeout: Duration) -> Result<String, ProbeError> {
        if let Some(base) = &self.base_url {
            return Ok(base.clone());
        }
        let table = self
            .bootstrap
            .get_or_try_init(|| self.load_bootstrap(timeout))
            .await?;
        find_base_url(table, domain).ok_or_else(|| ProbeError::NoRdapServer(domain.to_string()))
    }

    async fn load_bootstrap(&self, timeout: Duration) -> Result<BootstrapTable, ProbeError> {
        tracing::debug!(url = %self.bootstrap_url, "Loading RDAP bootstrap data");
        let response = self
            .http
            .get(&self.bootstrap_url)
            .timeout(timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Http {
                status: status.as_u16(),
                url: self.bootstrap_url.clone(),
            });
        }
        let body = response.bytes().await?;
        let data: BootstrapResponse =
            serde_json::from_slice(&body).map_err(|e| ProbeError::Json(e.to_string()))?;

        let mut table = BootstrapTable::new();
        for (suffixes, urls) in data.services {
            let Some(url) = pick_url(&urls) else {
                continue;
            };
            for suffix in suffixes {
                table.insert(suffix.to_ascii_lowercase(), url.to_string());
            }
        }
        tracing::debug!(entries = table.len(), "RDAP bootstrap loaded");
        Ok(table)
    }
}

// Prefer https endpoints; the registry lists them in no particular order.
fn pick_url(urls: &[String]) -> Option<&str> {
    urls.iter()
        .find(|u| u.starts_with("https://"))
        .or_else(|| urls.first())
        .map(String::as_str)
}

/// Longest label suffix of `domain` present in the bootstrap table.
fn find_base_url(table: &BootstrapTable, domain: &str) -> Option<String> {
    let mut rest = domain;
    loop {
        if let Some(url) = table.get(rest) {
            return Some(url.clone());
        }
        let (_, tail) = rest.split_once('.')?;
        rest = tail;
    }
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
