use certwatch::config::{AppConfig, TelegramConfig};
use certwatch::result::CheckKind;
use certwatch::service::CheckService;
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("local addr").port()
}

#[tokio::test]
async fn test_certificate_run_drops_bad_candidates_and_alerts_failures() {
    let telegram = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botservice-token/sendMessage"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&telegram)
        .await;

    let first = closed_port().await;
    let second = closed_port().await;
    let config = AppConfig {
        targets: vec![
            format!("127.0.0.1:{first}"),
            "bad:notaport".to_string(),
            format!("127.0.0.1:{second}"),
        ],
        timeout_seconds: 2,
        telegram: TelegramConfig {
            token: Some("service-token".to_string()),
            chat_id: Some("99".to_string()),
            api_base: telegram.uri(),
        },
        ..AppConfig::default()
    };

    let service = CheckService::from_config(Arc::new(config)).expect("service");
    assert!(service.notifier_enabled());

    let results = service.run(CheckKind::Certificate).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.ok()));
    assert!(results.iter().all(|r| r.kind() == CheckKind::Certificate));
    assert!(
        results
            .iter()
            .all(|r| r.error().is_some_and(|e| e.starts_with("Connect:")))
    );
}

#[tokio::test]
async fn test_run_without_targets_is_empty() {
    let service = CheckService::from_config(Arc::new(AppConfig::default())).expect("service");
    assert!(!service.notifier_enabled());
    assert!(service.run(CheckKind::Certificate).await.is_empty());
    assert!(service.run(CheckKind::Domain).await.is_empty());
}

#[tokio::test]
async fn test_domain_run_uses_configured_rdap_server() {
    let rdap = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domain/soon.example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ldhName": "soon.example",
            "events": [{ "eventAction": "expiration", "eventDate": "2031-01-01T00:00:00Z" }]
        })))
        .mount(&rdap)
        .await;
    Mock::given(method("GET"))
        .and(path("/domain/gone.example"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&rdap)
        .await;

    let mut config = AppConfig {
        targets: vec!["gone.example".to_string(), "soon.example".to_string()],
        ..AppConfig::default()
    };
    config.rdap.base_url = Some(rdap.uri());

    let service = CheckService::from_config(Arc::new(config)).expect("service");
    let results = service.run(CheckKind::Domain).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].host(), "soon.example");
    assert!(results[0].ok());
    assert_eq!(results[1].host(), "gone.example");
    assert!(!results[1].ok());
}

#[tokio::test]
async fn test_mistyped_port_is_reported_not_dropped() {
    let config = AppConfig {
        targets: vec!["127.0.0.1:70000".to_string()],
        timeout_seconds: 2,
        ..AppConfig::default()
    };
    let service = CheckService::from_config(Arc::new(config)).expect("service");

    let results = service.run(CheckKind::Certificate).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].port(), 70000);
    assert_eq!(results[0].error(), Some("Connect: port 70000 out of range"));
}
