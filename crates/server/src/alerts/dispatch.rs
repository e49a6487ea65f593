//! Urgency ordering, threshold evaluation and paced alert delivery.

use crate::alerts::message::render_alert;
use crate::alerts::telegram::NotifySink;
use crate::result::CheckResult;
use std::cmp::Ordering;
use tokio::time::{Duration, sleep};

/// Gap enforced between two consecutive outbound notifications.
pub const NOTIFY_PACING: Duration = Duration::from_millis(200);

/// Successful results by remaining days (soonest first), then every failure; ties by host.
pub fn compare_urgency(a: &CheckResult, b: &CheckResult) -> Ordering {
    let key = |r: &CheckResult| r.days_remaining().unwrap_or(i64::MAX);
    key(a).cmp(&key(b)).then_with(|| a.host().cmp(b.host()))
}

pub fn sort_batch(batch: &mut [CheckResult]) {
    batch.sort_by(compare_urgency);
}

/// Failures always alert; successes alert once `days_remaining <= threshold_days`.
pub fn should_alert(result: &CheckResult, threshold_days: i64) -> bool {
    match result.days_remaining() {
        Some(days) => days <= threshold_days,
        None => true,
    }
}

/// Sort the batch and notify `sink` about every alerting result, one message at a time.
///
/// Delivery problems are logged and skipped; they never change the returned batch.
#[tracing::instrument(skip(batch, sink), fields(results = batch.len(), notify = sink.is_some()))]
pub async fn finalize<S: NotifySink>(
    mut batch: Vec<CheckResult>,
    threshold_days: i64,
    sink: Option<&S>,
) -> Vec<CheckResult> {
    sort_batch(&mut batch);

    let Some(sink) = sink else {
        return batch;
    };

    let mut sent_any = false;
    for result in batch.iter().filter(|r| should_alert(r, threshold_days)) {
        if sent_any {
            sleep(NOTIFY_PACING).await;
        }
        sent_any = true;

        let text = render_alert(result);
        match sink.send(&text).await {
            Ok(()) => tracing::info!(
                name = "alerts.notify.sent",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                kind = %result.kind(),
                host = %result.host(),
                ok = result.ok(),
                days_remaining = ?result.days_remaining(),
                message = "Sent alert"
            ),
            Err(e) => tracing::warn!(
                name = "alerts.notify.failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                kind = %result.kind(),
                host = %result.host(),
                error = %e,
                message = "Failed to send alert, continuing with the rest"
            ),
        }
    }

    batch
}
