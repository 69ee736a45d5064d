//! Notification lifecycle events
//!
//! Published on the [`EventBus`](super::EventBus) so a host can render banners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kind::NotificationKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// Banner attached to the container
    Shown(ShownEvent),
    /// Duration elapsed, fade-out started
    FadingOut(LifecycleEvent),
    /// Banner detached, either after the fade or on dismiss
    Removed(LifecycleEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShownEvent {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub icon: String,
    pub message: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub id: Uuid,
}

impl NotificationEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            NotificationEvent::Shown(_) => "shown",
            NotificationEvent::FadingOut(_) => "fading_out",
            NotificationEvent::Removed(_) => "removed",
        }
    }

    pub fn notification_id(&self) -> Uuid {
        match self {
            NotificationEvent::Shown(e) => e.id,
            NotificationEvent::FadingOut(e) | NotificationEvent::Removed(e) => e.id,
        }
    }
}

/// Event with delivery metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: NotificationEvent,
}

impl EventMessage {
    pub fn new(event: NotificationEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}
