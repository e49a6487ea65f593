use crate::error::ProbeError;
use crate::probe::Prober;
use crate::probe::tls::shared_accept_any_certificate_config;
use crate::result::{CheckKind, CheckResult};
use crate::targets::Target;
use rustls_pki_types::{CertificateDer, ServerName};
use std::net::IpAddr;
use std::time::Instant;
use time::OffsetDateTime;
use tokio::net::TcpStream;
use tokio::time::{Duration, timeout};
use tokio_rustls::TlsConnector;
use x509_parser::prelude::{FromDer, X509Certificate};

/// Reads the expiry of the leaf certificate a server presents.
#[derive(Debug, Default, Clone)]
pub struct CertificateProber;

impl CertificateProber {
    pub fn new() -> Self {
        Self
    }
}

impl Prober for CertificateProber {
    fn kind(&self) -> CheckKind {
        CheckKind::Certificate
    }

    async fn probe(&self, target: &Target, timeout: Duration) -> CheckResult {
        probe_certificate(&target.host, target.port, timeout).await
    }
}

#[tracing::instrument(name = "probe_certificate", level = "debug", skip(timeout))]
pub async fn probe_certificate(host: &str, port: i32, timeout: Duration) -> CheckResult {
    let start = Instant::now();
    let not_after = fetch_leaf_not_after(host, port, timeout).await;
    let elapsed_millis = start.elapsed().as_millis() as u64;

    match not_after {
        Ok(not_after) => CheckResult::expires(
            CheckKind::Certificate,
            host,
            port,
            not_after,
            OffsetDateTime::now_utc(),
            elapsed_millis,
        ),
        Err(e) => {
            tracing::debug!(
                name = "probe.certificate.failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                host = %host,
                port = port,
                error = %e,
                message = "Certificate probe failed"
            );
            CheckResult::failed(CheckKind::Certificate, host, port, e.to_string(), elapsed_millis)
        }
    }
}

async fn fetch_leaf_not_after(
    host: &str,
    port: i32,
    limit: Duration,
) -> Result<OffsetDateTime, ProbeError> {
    let port = u16::try_from(port)
        .map_err(|_| ProbeError::Connect(format!("port {port} out of range")))?;
    let stream = timeout(limit, TcpStream::connect((host, port)))
        .await
        .map_err(|_| ProbeError::Timeout {
            stage: "connect",
            after: limit,
        })
        .and_then(|r| r.map_err(|e| ProbeError::Connect(e.to_string())))?;

    let peer_ip = stream
        .peer_addr()
        .map_err(|e| ProbeError::Connect(e.to_string()))?
        .ip();

    let config =
        shared_accept_any_certificate_config().map_err(|e| ProbeError::Tls(e.to_string()))?;
    let connector = TlsConnector::from(config);

    let tls_stream = timeout(limit, connector.connect(server_name_for(host, peer_ip), stream))
        .await
        .map_err(|_| ProbeError::Timeout {
            stage: "handshake",
            after: limit,
        })
        .and_then(|r| r.map_err(|e| ProbeError::Tls(e.to_string())))?;

    let (_io, connection) = tls_stream.get_ref();
    let leaf = connection
        .peer_certificates()
        .and_then(|chain| chain.first())
        .ok_or(ProbeError::NoUsableCertificate)?;

    leaf_not_after(leaf)
}

/// Name to present to the server. DNS names are sent as SNI; anything else (IP literals,
/// names rustls cannot represent) is keyed by the connected peer address, which rustls
/// never puts in the SNI extension.
pub fn server_name_for(host: &str, peer_ip: IpAddr) -> ServerName<'static> {
    ServerName::try_from(host.to_string()).unwrap_or(ServerName::IpAddress(peer_ip.into()))
}

/// `notAfter` of a DER encoded certificate.
pub fn leaf_not_after(der: &CertificateDer<'_>) -> Result<OffsetDateTime, ProbeError> {
    let (_, cert) =
        X509Certificate::from_der(der.as_ref()).map_err(|_| ProbeError::NoUsableCertificate)?;
    Ok(cert.validity().not_after.to_datetime())
}
