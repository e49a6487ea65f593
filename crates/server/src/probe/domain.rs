use crate::error::ProbeError;
use crate::probe::Prober;
use crate::probe::rdap::RdapClient;
use crate::result::{CheckKind, CheckResult};
use crate::targets::Target;
use std::time::{Duration, Instant};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

const UTC_Z: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
const WITH_OFFSET: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);
const DATE_ONLY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Reads a domain's registration expiry from RDAP.
#[derive(Debug, Clone)]
pub struct DomainProber {
    rdap: RdapClient,
}

impl DomainProber {
    pub fn new(rdap: RdapClient) -> Self {
        Self { rdap }
    }
}

impl Prober for DomainProber {
    fn kind(&self) -> CheckKind {
        CheckKind::Domain
    }

    #[tracing::instrument(name = "probe_domain", level = "debug", skip(self, target, timeout), fields(host = %target.host, port = target.port))]
    async fn probe(&self, target: &Target, timeout: Duration) -> CheckResult {
        let start = Instant::now();
        let expires_at = self.lookup_expiration(&target.host, timeout).await;
        let elapsed_millis = start.elapsed().as_millis() as u64;

        match expires_at {
            Ok(expires_at) => CheckResult::expires(
                CheckKind::Domain,
                &target.host,
                target.port,
                expires_at,
                OffsetDateTime::now_utc(),
                elapsed_millis,
            ),
            Err(e) => {
                tracing::debug!(
                    name = "probe.domain.failed",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    host = %target.host,
                    error = %e,
                    message = "Domain probe failed"
                );
                CheckResult::failed(
                    CheckKind::Domain,
                    &target.host,
                    target.port,
                    e.to_string(),
                    elapsed_millis,
                )
            }
        }
    }
}

impl DomainProber {
    async fn lookup_expiration(
        &self,
        host: &str,
        timeout: Duration,
    ) -> Result<OffsetDateTime, ProbeError> {
        let domain = self.rdap.lookup_domain(host, timeout).await?;
        let event = domain
            .expiration_event()
            .ok_or(ProbeError::NoExpirationEvent)?;
        let raw = event.event_date.as_deref().unwrap_or_default();
        parse_rdap_date(raw).ok_or_else(|| ProbeError::DateParse(raw.to_string()))
    }
}

/// Parse an RDAP event date into a UTC instant.
///
/// Forms are tried in order: `2030-01-01T00:00:00Z`, `2030-01-01T09:00:00+09:00`,
/// `2030-01-01` (midnight UTC), then any other RFC 3339 timestamp such as ones with
/// fractional seconds.
pub fn parse_rdap_date(raw: &str) -> Option<OffsetDateTime> {
    let s = raw.trim();
    if let Ok(dt) = PrimitiveDateTime::parse(s, UTC_Z) {
        return Some(dt.assume_utc());
    }
    if let Ok(dt) = OffsetDateTime::parse(s, WITH_OFFSET) {
        return Some(dt.to_offset(time::UtcOffset::UTC));
    }
    if let Ok(date) = Date::parse(s, DATE_ONLY) {
        return Some(PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc());
    }
    OffsetDateTime::parse(s, &Rfc3339)
        .ok()
        .map(|dt| dt.to_offset(time::UtcOffset::UTC))
}
