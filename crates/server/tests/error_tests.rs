use certwatch::error::{NotifyError, ProbeError};
use std::time::Duration;

#[test]
fn test_probe_error_display_starts_with_category() {
    let cases = [
        (
            ProbeError::Timeout {
                stage: "connect",
                after: Duration::from_secs(10),
            },
            "Timeout: connect timed out after 10s",
        ),
        (
            ProbeError::Connect("connection refused".into()),
            "Connect: connection refused",
        ),
        (ProbeError::Tls("bad record".into()), "Tls: bad record"),
        (
            ProbeError::NoUsableCertificate,
            "Certificate: no usable certificate chain",
        ),
        (
            ProbeError::NoRdapServer("host.invalid".into()),
            "Rdap: no RDAP server known for host.invalid",
        ),
        (
            ProbeError::Http {
                status: 404,
                url: "https://rdap.example/domain/x.example".into(),
            },
            "Http: status 404 from https://rdap.example/domain/x.example",
        ),
        (ProbeError::Json("eof".into()), "Json: eof"),
        (
            ProbeError::NoExpirationEvent,
            "Domain: no expiration event present",
        ),
        (
            ProbeError::DateParse("soon".into()),
            "Domain: date parse failure for \"soon\"",
        ),
        (ProbeError::Internal("boom".into()), "Internal: boom"),
    ];
    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_notify_status_display() {
    assert_eq!(
        NotifyError::Status(429).to_string(),
        "Notification endpoint answered HTTP 429"
    );
}
