//! Terminal notifications.

use lumen_client::{Notification, NotificationLevel, Notifier};

/// Prints notifications to the terminal: errors to stderr, the rest to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    fn render(notification: &Notification) -> String {
        let tag = match notification.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        format!("[{}] {}", tag, notification.message)
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(level = ?notification.level, message = %notification.message, "Notification");

        let line = Self::render(&notification);
        if notification.is_error() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}
