//! Recurring background check runs.

use crate::alerts::message::DISPLAY_OFFSET;
use crate::config::ScheduleConfig;
use crate::result::CheckKind;
use crate::service::CheckService;
use std::sync::Arc;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, Time, UtcOffset};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};

const START_AT_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// Parse a zero padded 24-hour `HH:MM` wall-clock time.
pub fn parse_start_at(raw: &str) -> Option<Time> {
    Time::parse(raw.trim(), START_AT_FORMAT).ok()
}

/// Time from `now` until the next `at` on the clock of `offset`. Never zero: when `now`
/// is exactly `at`, the next day's occurrence is used.
pub fn until_next(at: Time, offset: UtcOffset, now: OffsetDateTime) -> Duration {
    let local = now.to_offset(offset);
    let mut next = local.replace_time(at);
    if next <= local {
        next += time::Duration::days(1);
    }
    Duration::try_from(next - local).unwrap_or(Duration::ZERO)
}

/// Start the recurring checker, or return `None` when scheduling is disabled.
///
/// Each tick runs every configured kind one after another. Ticks missed while a run is
/// still going are pushed back, so runs never overlap.
pub fn spawn_scheduler(
    service: Arc<CheckService>,
    schedule: ScheduleConfig,
) -> Option<JoinHandle<()>> {
    if !schedule.enabled || schedule.checks.is_empty() {
        tracing::info!(
            name = "schedule.disabled",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            message = "Scheduled checks disabled"
        );
        return None;
    }

    let period = Duration::from_secs(schedule.interval_secs.max(1));
    let start_at = schedule.start_at.as_deref().and_then(parse_start_at);
    let first_delay = match start_at {
        Some(at) => until_next(at, DISPLAY_OFFSET, OffsetDateTime::now_utc()),
        None => period,
    };
    let first_tick = Instant::now() + first_delay;

    tracing::info!(
        name = "schedule.started",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        interval_secs = period.as_secs(),
        run_on_startup = schedule.run_on_startup,
        start_at = ?schedule.start_at,
        first_run_in_secs = first_delay.as_secs(),
        checks = ?schedule.checks,
        message = "Scheduled checks enabled"
    );

    Some(tokio::spawn(async move {
        if schedule.run_on_startup {
            run_all(&service, &schedule.checks).await;
        }
        let mut ticker = interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_all(&service, &schedule.checks).await;
        }
    }))
}

async fn run_all(service: &CheckService, checks: &[CheckKind]) {
    for kind in checks {
        let results = service.run(*kind).await;
        tracing::info!(
            name = "schedule.run.completed",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            kind = %kind,
            results = results.len(),
            message = "Scheduled check run completed"
        );
    }
}
