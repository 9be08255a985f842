//! Notification delivery for schedule reports.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification channels
//! - Telegram Bot API notifier
//! - Dispatcher delivering a run's payloads in order, all-or-nothing

pub mod dispatcher;
pub mod telegram;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use telegram::TelegramNotifier;
pub use traits::{DispatchResult, Notification, Notifier, NotifyError};
