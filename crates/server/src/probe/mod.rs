//! Expiry probes. Each probe turns one [`Target`] into one [`CheckResult`] and never fails
//! past that boundary.
//!
//! - tls: rustls client configuration that reads certificates without trusting them
//! - certificate: TLS handshake and leaf certificate `notAfter` extraction
//! - rdap: RDAP bootstrap + domain lookup client
//! - domain: registration expiry from the RDAP `expiration` event

pub mod certificate;
pub mod domain;
pub mod rdap;
pub mod tls;

use crate::result::{CheckKind, CheckResult};
use crate::targets::Target;
use std::future::Future;
use std::time::Duration;

pub use certificate::CertificateProber;
pub use domain::DomainProber;
pub use rdap::RdapClient;

/// A check that can be fanned out over many targets.
pub trait Prober: Send + Sync + 'static {
    fn kind(&self) -> CheckKind;

    /// Probe one target. Every failure is reported inside the returned result.
    fn probe(&self, target: &Target, timeout: Duration)
    -> impl Future<Output = CheckResult> + Send;
}
