//! Notifications raised by the dashboard after refreshes and status changes.
//!
//! RULE: SeriesGenerator and RecordFilter never notify. Only the dashboard
//! layer that wraps them pushes into a sink.

use crate::types::{RecordId, RiskLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Success,
}

impl Severity {
    pub fn log_level(&self) -> log::Level {
        match self {
            Self::Critical => log::Level::Error,
            Self::Warning  => log::Level::Warn,
            Self::Info     => log::Level::Info,
            Self::Success  => log::Level::Info,
        }
    }

    /// Map an alert type label ("Critical", "Warning", ...) onto a severity.
    /// Unknown labels fall back to `Info`.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "warning"  => Self::Warning,
            "success"  => Self::Success,
            _          => Self::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Critical => "critical",
            Self::Warning  => "warning",
            Self::Info     => "info",
            Self::Success  => "success",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationDetails {
    pub source: Option<String>,
    pub impact_level: Option<RiskLevel>,
    pub category: Option<String>,
    pub action: Option<String>,
    #[serde(default)]
    pub related_event_ids: Vec<RecordId>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    #[serde(default)]
    pub details: NotificationDetails,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            details: NotificationDetails::default(),
        }
    }

    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.details.source = Some(source.into());
        self
    }

    pub fn with_impact(mut self, level: RiskLevel) -> Self {
        self.details.impact_level = Some(level);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.details.category = Some(category.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.details.action = Some(action.into());
        self
    }

    pub fn related_to(mut self, id: impl Into<RecordId>) -> Self {
        self.details.related_event_ids.push(id.into());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.details.timestamp = Some(timestamp);
        self
    }
}

/// Presentation sink for notifications (toasts, banners, logs).
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Writes every notification to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, n: Notification) {
        let source = n.details.source.as_deref().unwrap_or("dashboard");
        log::log!(n.severity.log_level(), "notify[{}] {source}: {}", n.severity, n.message);
    }
}

/// Keeps notifications in memory, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub received: Vec<Notification>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Notification> + '_ {
        self.received.iter().filter(move |n| n.severity == severity)
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.received)
    }
}

impl NotificationSink for MemorySink {
    fn notify(&mut self, notification: Notification) {
        self.received.push(notification);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}
