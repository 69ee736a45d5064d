use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::NotificationConfig;

/// Banner flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "fas fa-check-circle",
            NotificationKind::Error => "fas fa-exclamation-circle",
            NotificationKind::Warning => "fas fa-exclamation-triangle",
            NotificationKind::Info => "fas fa-info-circle",
        }
    }

    /// Bootstrap alert class; `error` renders as `danger`
    pub fn alert_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "alert-success",
            NotificationKind::Error => "alert-danger",
            NotificationKind::Warning => "alert-warning",
            NotificationKind::Info => "alert-info",
        }
    }

    pub fn default_duration(&self, config: &NotificationConfig) -> Duration {
        let ms = match self {
            NotificationKind::Success => config.success_ms,
            NotificationKind::Error => config.error_ms,
            NotificationKind::Warning => config.warning_ms,
            NotificationKind::Info => config.info_ms,
        };
        Duration::from_millis(ms)
    }

    /// Map a flash-message tag. Matching is exact; anything else is `Info`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "success" => NotificationKind::Success,
            "error" => NotificationKind::Error,
            "warning" => NotificationKind::Warning,
            _ => NotificationKind::Info,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
