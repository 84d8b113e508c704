//! User-facing notifications for terminal deploy states.

use tracing::{error, info, warn};

use crate::domain::diagnostic::Severity;

/// Sink for user-facing notifications.
///
/// The editor integration implements this; every terminal deploy state emits
/// exactly one notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Discards all notifications.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _severity: Severity, _message: &str) {}
}

/// Routes notifications onto the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => info!(target: "orgflow::notify", "{message}"),
            Severity::Warning => warn!(target: "orgflow::notify", "{message}"),
            Severity::Error => error!(target: "orgflow::notify", "{message}"),
        }
    }
}
