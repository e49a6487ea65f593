//! Notification text for alerting results (Telegram HTML parse mode).

use crate::result::{CheckResult, Outcome};
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, offset};
use time::{OffsetDateTime, UtcOffset};

/// Korea Standard Time, the zone expiry instants are shown in.
pub const DISPLAY_OFFSET: UtcOffset = offset!(+9);

const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// `yyyy-MM-dd HH:mm` in [`DISPLAY_OFFSET`].
pub fn format_display_time(instant: OffsetDateTime) -> String {
    instant
        .to_offset(DISPLAY_OFFSET)
        .format(DISPLAY_FORMAT)
        .unwrap_or_else(|_| instant.to_string())
}

pub fn render_alert(result: &CheckResult) -> String {
    let kind = result.kind();
    let host = escape_html(result.host());
    match result.outcome() {
        Outcome::Expires {
            expires_at,
            days_remaining,
        } => format!(
            "🔔 <b>{kind} expiring soon</b>\n\
             • Host: <code>{host}</code>\n\
             • Days remaining: <b>{days_remaining}</b>\n\
             • Expires (KST): <code>{}</code>",
            format_display_time(*expires_at)
        ),
        Outcome::Failed { error } => format!(
            "⚠️ <b>{kind} check failed</b>\n\
             • Host: <code>{host}</code>\n\
             • Error: <code>{}</code>",
            escape_html(error)
        ),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
