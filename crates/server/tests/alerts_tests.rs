use certwatch::alerts::{NOTIFY_PACING, NotifySink, finalize};
use certwatch::error::NotifyError;
use certwatch::result::{CheckKind, CheckResult};
use std::sync::Mutex;
use time::OffsetDateTime;
use tokio::time::Instant;

/// Records every message; optionally rejects the n-th one (1-based).
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(Instant, String)>>,
    fail_on: Option<usize>,
}

impl RecordingSink {
    fn failing_on(n: usize) -> Self {
        Self {
            fail_on: Some(n),
            ..Self::default()
        }
    }

    fn messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn instants(&self) -> Vec<Instant> {
        self.sent.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

impl NotifySink for RecordingSink {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let attempt = {
            let mut sent = self.sent.lock().unwrap();
            sent.push((Instant::now(), text.to_string()));
            sent.len()
        };
        if self.fail_on == Some(attempt) {
            return Err(NotifyError::Status(500));
        }
        Ok(())
    }
}

fn ok(host: &str, days: i64) -> CheckResult {
    let now = OffsetDateTime::now_utc();
    CheckResult::expires(
        CheckKind::Certificate,
        host,
        443,
        now + time::Duration::days(days) + time::Duration::hours(1),
        now,
        1,
    )
}

fn failed(host: &str) -> CheckResult {
    CheckResult::failed(CheckKind::Certificate, host, 443, "Connect: refused", 1)
}

#[tokio::test]
async fn test_batch_is_sorted_by_urgency_without_a_sink() {
    let batch = vec![failed("b"), ok("far", 300), ok("near", 2), failed("a"), ok("past", -4)];

    let sorted = finalize::<RecordingSink>(batch, 30, None).await;

    let hosts: Vec<_> = sorted.iter().map(CheckResult::host).collect();
    assert_eq!(hosts, ["past", "near", "far", "a", "b"]);
}

#[tokio::test]
async fn test_only_results_within_threshold_or_failed_alert() {
    let sink = RecordingSink::default();
    let batch = vec![ok("far", 31), ok("edge", 30), failed("down"), ok("soon", 1)];

    let sorted = finalize(batch, 30, Some(&sink)).await;

    assert_eq!(sorted.len(), 4);
    let messages = sink.messages();
    assert_eq!(messages.len(), 3);
    // Delivered in sorted order.
    assert!(messages[0].contains("<code>soon</code>"));
    assert!(messages[1].contains("<code>edge</code>"));
    assert!(messages[2].contains("<code>down</code>"));
    assert!(messages[2].contains("check failed"));
    assert!(messages.iter().all(|m| !m.contains("<code>far</code>")));
}

#[tokio::test]
async fn test_sends_are_paced() {
    let sink = RecordingSink::default();
    let batch = (0..5).map(|i| failed(&format!("host-{i}"))).collect();

    let started = Instant::now();
    finalize(batch, 30, Some(&sink)).await;

    let instants = sink.instants();
    assert_eq!(instants.len(), 5);
    // No wait before the first message.
    assert!(instants[0] - started < NOTIFY_PACING);
    for pair in instants.windows(2) {
        assert!(pair[1] - pair[0] >= NOTIFY_PACING);
    }
}

#[tokio::test]
async fn test_failed_send_does_not_stop_the_rest() {
    let sink = RecordingSink::failing_on(2);
    let batch: Vec<_> = (0..5).map(|i| failed(&format!("host-{i}"))).collect();

    let sorted = finalize(batch, 30, Some(&sink)).await;

    assert_eq!(sorted.len(), 5);
    assert_eq!(sink.messages().len(), 5);
    assert!(sorted.iter().all(|r| r.error() == Some("Connect: refused")));
}

#[tokio::test]
async fn test_nothing_sent_when_nothing_alerts() {
    let sink = RecordingSink::default();
    finalize(vec![ok("a", 100), ok("b", 200)], 30, Some(&sink)).await;
    assert!(sink.messages().is_empty());
}
