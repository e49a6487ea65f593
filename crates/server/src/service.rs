//! Wires target resolution, the probe engine and alerting into one call per check kind.

use crate::alerts::dispatch::finalize;
use crate::alerts::telegram::TelegramNotifier;
use crate::config::AppConfig;
use crate::engine::run_batch;
use crate::error::ProbeError;
use crate::probe::{CertificateProber, DomainProber, RdapClient};
use crate::result::{CheckKind, CheckResult};
use crate::targets;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CheckService {
    config: Arc<AppConfig>,
    certificates: Arc<CertificateProber>,
    domains: Arc<DomainProber>,
    notifier: Option<TelegramNotifier>,
}

impl CheckService {
    pub fn new(
        config: Arc<AppConfig>,
        notifier: Option<TelegramNotifier>,
    ) -> Result<Self, ProbeError> {
        let rdap = RdapClient::new(&config.rdap)?;
        Ok(Self {
            config,
            certificates: Arc::new(CertificateProber::new()),
            domains: Arc::new(DomainProber::new(rdap)),
            notifier,
        })
    }

    /// Same as [`CheckService::new`], with the notifier taken from the Telegram settings.
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self, ProbeError> {
        let notifier = TelegramNotifier::from_config(&config.telegram);
        if notifier.is_none() {
            tracing::info!(
                name = "service.notifier.disabled",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                message = "Telegram token or chat id missing, alerts will only be logged"
            );
        }
        Self::new(config, notifier)
    }

    pub fn notifier_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Run one batch of `kind` checks over the configured targets.
    ///
    /// Returns the batch sorted by urgency, after alerts (if configured) were sent.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, kind: CheckKind) -> Vec<CheckResult> {
        let raw = targets::resolve(&self.config.targets, self.config.targets_file.as_deref()).await;
        let parsed = targets::parse_targets(&raw);
        tracing::info!(
            name = "service.run.start",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            kind = %kind,
            resolved = raw.len(),
            parsed = parsed.len(),
            message = "Starting check run"
        );

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let workers = self.config.workers;
        let batch = match kind {
            CheckKind::Certificate => {
                run_batch(parsed, timeout, workers, self.certificates.clone()).await
            }
            CheckKind::Domain => run_batch(parsed, timeout, workers, self.domains.clone()).await,
        };

        let batch = finalize(batch, self.config.threshold_days, self.notifier.as_ref()).await;

        tracing::info!(
            name = "service.run.finished",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            kind = %kind,
            results = batch.len(),
            failed = batch.iter().filter(|r| !r.ok()).count(),
            message = "Check run finished"
        );
        batch
    }
}
