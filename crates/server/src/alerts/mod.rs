//! Alerting for finished batches.
//!
//! This module handles:
//! - Ordering a batch by urgency
//! - Deciding which results cross the alert threshold
//! - Rendering and pacing Telegram notifications
//!
//! ## Submodules
//!
//! - `dispatch` - Sorting, threshold check and paced delivery
//! - `message` - Notification text
//! - `telegram` - Notification sink trait and Telegram implementation

pub mod dispatch;
pub mod message;
pub mod telegram;

pub use dispatch::{NOTIFY_PACING, compare_urgency, finalize, should_alert, sort_batch};
pub use message::{DISPLAY_OFFSET, format_display_time, render_alert};
pub use telegram::{NotifySink, TelegramNotifier};
