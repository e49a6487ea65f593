//! Bounded fan-out of one probe per target.

use crate::error::ProbeError;
use crate::probe::Prober;
use crate::result::CheckResult;
use crate::targets::Target;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Probe every target with at most `max(1, workers)` probes in flight.
///
/// Results come back in the order the targets were given. A task that dies without
/// producing a result (panic, runtime shutdown) is reported as a failed result for its
/// target, so the output always has one entry per input target.
#[tracing::instrument(skip(targets, prober), fields(targets = targets.len(), kind = %prober.kind()))]
pub async fn run_batch<P: Prober>(
    targets: Vec<Target>,
    timeout: Duration,
    workers: usize,
    prober: Arc<P>,
) -> Vec<CheckResult> {
    let workers = workers.max(1);
    let kind = prober.kind();
    let semaphore = Arc::new(Semaphore::new(workers));

    tracing::debug!(
        name = "engine.batch.start",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        workers = workers,
        timeout_secs = timeout.as_secs(),
        message = "Starting probe batch"
    );

    let submitted: Vec<(Target, Instant, _)> = targets
        .into_iter()
        .map(|target| {
            let semaphore = semaphore.clone();
            let prober = prober.clone();
            let task_target = target.clone();
            let handle = tokio::spawn(async move {
                match semaphore.acquire_owned().await {
                    Ok(_permit) => prober.probe(&task_target, timeout).await,
                    Err(e) => CheckResult::failed(
                        kind,
                        &task_target.host,
                        task_target.port,
                        ProbeError::Internal(format!("worker pool unavailable: {e}")).to_string(),
                        0,
                    ),
                }
            });
            (target, Instant::now(), handle)
        })
        .collect();

    let (meta, handles): (Vec<_>, Vec<_>) = submitted
        .into_iter()
        .map(|(target, started, handle)| ((target, started), handle))
        .unzip();

    let joined = futures::future::join_all(handles).await;
    semaphore.close();

    joined
        .into_iter()
        .zip(meta)
        .map(|(outcome, (target, started))| match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    name = "engine.task.failed",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    endpoint = %target,
                    error = %e,
                    message = "Probe task did not complete"
                );
                CheckResult::failed(
                    kind,
                    target.host,
                    target.port,
                    ProbeError::Internal(format!("probe task failed: {e}")).to_string(),
                    started.elapsed().as_millis() as u64,
                )
            }
        })
        .collect()
}
