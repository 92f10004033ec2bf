use crate::domain::model::{Notification, NotificationLevel};
use crate::domain::ports::Notifier;
use std::sync::{Arc, Mutex};

/// Sends notifications to the log.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!("✅ {}: {}", notification.title, notification.message)
            }
            NotificationLevel::Error => {
                tracing::error!("❌ {}: {}", notification.title, notification.message)
            }
        }
    }
}

/// Keeps every notification so a caller can show or inspect them later.
#[derive(Debug, Clone, Default)]
pub struct CollectingNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|mut received| std::mem::take(&mut *received))
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification.clone());
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}
