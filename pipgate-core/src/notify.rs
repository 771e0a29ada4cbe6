//! Notification sink.
//!
//! The risk manager reports approvals, rejections and kill-switch events
//! through a [`NotificationSink`]. Hosts plug in whatever they have (Slack,
//! Telegram, a GUI toast); the default forwards to `tracing` and a
//! [`NullSink`] drops everything. A missing or failing sink never affects
//! the decisions themselves.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    Info,
    Warning,
    Error,
    Success,
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, level: NotifyLevel);
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _message: &str, _level: NotifyLevel) {}
}

/// Forwards notifications to the `tracing` subscriber, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str, level: NotifyLevel) {
        match level {
            NotifyLevel::Info => tracing::info!(target: "pipgate::notify", "{message}"),
            NotifyLevel::Warning => tracing::warn!(target: "pipgate::notify", "{message}"),
            NotifyLevel::Error => tracing::error!(target: "pipgate::notify", "{message}"),
            NotifyLevel::Success => {
                tracing::info!(target: "pipgate::notify", outcome = "success", "{message}")
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Captures notifications for assertions.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSink {
        pub events: Arc<Mutex<Vec<(String, NotifyLevel)>>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, message: &str, level: NotifyLevel) {
            self.events
                .lock()
                .expect("recording sink lock")
                .push((message.to_string(), level));
        }
    }
}
