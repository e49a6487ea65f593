//! TLS client configuration for certificate inspection.
//!
//! The probe reports what a server presents, whether or not a browser would accept it, so
//! the only configuration offered here accepts every chain. It must not be reused for
//! traffic that relies on the peer being authenticated.

use once_cell::sync::OnceCell;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use rustls_pki_types::{CertificateDer, ServerName, UnixTime};
use std::sync::Arc;

static ACCEPT_ANY_CONFIG: OnceCell<Arc<ClientConfig>> = OnceCell::new();

/// Verifier that records nothing and rejects nothing.
#[derive(Debug)]
pub struct AcceptAnyCertificate {
    schemes: Vec<SignatureScheme>,
}

impl AcceptAnyCertificate {
    pub fn new(provider: &CryptoProvider) -> Self {
        Self {
            schemes: provider
                .signature_verification_algorithms
                .supported_schemes(),
        }
    }
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.schemes.clone()
    }
}

/// Build a client configuration whose verifier accepts any certificate chain, including
/// expired, self-signed and hostname-mismatched ones.
///
/// Uses the ring provider explicitly so no process-wide default has to be installed.
pub fn accept_any_certificate_config() -> Result<ClientConfig, rustls::Error> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = Arc::new(AcceptAnyCertificate::new(&provider));
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(verifier)
        .with_no_client_auth();
    Ok(config)
}

/// Shared instance of [`accept_any_certificate_config`], built on first use.
pub fn shared_accept_any_certificate_config() -> Result<Arc<ClientConfig>, rustls::Error> {
    ACCEPT_ANY_CONFIG
        .get_or_try_init(|| accept_any_certificate_config().map(Arc::new))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_config_is_reused() {
        let a = shared_accept_any_certificate_config().unwrap();
        let b = shared_accept_any_certificate_config().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.enable_sni);
    }

    #[test]
    fn verifier_advertises_provider_schemes() {
        let provider = rustls::crypto::ring::default_provider();
        let verifier = AcceptAnyCertificate::new(&provider);
        let schemes = verifier.supported_verify_schemes();
        assert!(schemes.contains(&SignatureScheme::ECDSA_NISTP256_SHA256));
        assert!(schemes.contains(&SignatureScheme::RSA_PSS_SHA256));
    }
}
