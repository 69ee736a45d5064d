use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use super::event_bus::{EventBus, SharedEventBus};
use super::events::{LifecycleEvent, NotificationEvent, ShownEvent};
use super::kind::NotificationKind;
use crate::config::NotificationConfig;
use crate::infrastructure::http::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    FadingOut,
}

/// An attached banner
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub duration: Duration,
    pub phase: Phase,
    seq: u64,
}

/// Page-level container, created on first use
#[derive(Default)]
struct Container {
    entries: DashMap<Uuid, Notification>,
}

struct Inner {
    config: NotificationConfig,
    container: OnceLock<Container>,
    bus: SharedEventBus,
    seq: AtomicU64,
}

/// Shows dismissible, auto-expiring banners.
///
/// Cloning is cheap; every clone shares one container and one event bus.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl NotificationCenter {
    pub fn new(config: NotificationConfig) -> Self {
        Self::with_bus(config, Arc::new(EventBus::new()))
    }

    pub fn with_bus(config: NotificationConfig, bus: SharedEventBus) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                container: OnceLock::new(),
                bus,
                seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn bus(&self) -> &SharedEventBus {
        &self.inner.bus
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.inner.config
    }

    /// Whether any banner was ever shown on this page
    pub fn has_container(&self) -> bool {
        self.inner.container.get().is_some()
    }

    fn container(&self) -> &Container {
        self.inner.container.get_or_init(|| {
            debug!("Notification container created");
            Container::default()
        })
    }

    /// Attach a banner and schedule its removal.
    ///
    /// `duration` falls back to the kind's default. Outside a Tokio runtime the
    /// banner stays until [`dismiss`](Self::dismiss) is called.
    pub fn show(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Option<Duration>,
    ) -> NotificationHandle {
        let duration = duration.unwrap_or_else(|| kind.default_duration(&self.inner.config));
        let deadline = Instant::now() + duration;
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            duration,
            phase: Phase::Visible,
            seq: self.inner.seq.fetch_add(1, Ordering::SeqCst),
        };
        let id = notification.id;

        self.inner.bus.publish(NotificationEvent::Shown(ShownEvent {
            id,
            kind,
            icon: kind.icon().to_string(),
            message: notification.message.clone(),
            duration_ms: duration.as_millis() as u64,
        }));
        self.container().entries.insert(id, notification);

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let center = self.clone();
                let fade = Duration::from_millis(self.inner.config.fade_out_ms);
                runtime.spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    if !center.begin_fade(id) {
                        return;
                    }
                    tokio::time::sleep(fade).await;
                    center.detach(id);
                });
            }
            Err(_) => warn!(%id, "No runtime available; notification will not auto-dismiss"),
        }

        NotificationHandle {
            id,
            center: self.clone(),
        }
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationHandle {
        self.show(message, NotificationKind::Success, None)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationHandle {
        self.show(message, NotificationKind::Error, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationHandle {
        self.show(message, NotificationKind::Warning, None)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationHandle {
        self.show(message, NotificationKind::Info, None)
    }

    /// One error banner per message, formatted `field: message`
    pub fn show_form_errors(&self, errors: &FieldErrors) -> Vec<NotificationHandle> {
        errors
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |msg| format!("{}: {}", field, msg))
            })
            .map(|text| self.error(text))
            .collect()
    }

    /// Detach immediately, skipping the fade. Returns false if already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        self.detach(id)
    }

    pub fn is_attached(&self, id: Uuid) -> bool {
        self.inner
            .container
            .get()
            .is_some_and(|c| c.entries.contains_key(&id))
    }

    pub fn get(&self, id: Uuid) -> Option<Notification> {
        self.inner
            .container
            .get()
            .and_then(|c| c.entries.get(&id).map(|entry| entry.value().clone()))
    }

    /// Attached banners, oldest first
    pub fn list(&self) -> Vec<Notification> {
        let Some(container) = self.inner.container.get() else {
            return Vec::new();
        };
        let mut all: Vec<Notification> = container.entries.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|n| n.seq);
        all
    }

    fn begin_fade(&self, id: Uuid) -> bool {
        let Some(container) = self.inner.container.get() else {
            return false;
        };
        match container.entries.get_mut(&id) {
            Some(mut entry) => {
                entry.phase = Phase::FadingOut;
                drop(entry);
                self.inner
                    .bus
                    .publish(NotificationEvent::FadingOut(LifecycleEvent { id }));
                true
            }
            None => false,
        }
    }

    fn detach(&self, id: Uuid) -> bool {
        let removed = self
            .inner
            .container
            .get()
            .and_then(|c| c.entries.remove(&id))
            .is_some();
        if removed {
            self.inner
                .bus
                .publish(NotificationEvent::Removed(LifecycleEvent { id }));
        }
        removed
    }
}

/// Reference to a shown banner
#[derive(Clone)]
pub struct NotificationHandle {
    id: Uuid,
    center: NotificationCenter,
}

impl NotificationHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_attached(&self) -> bool {
        self.center.is_attached(self.id)
    }

    pub fn phase(&self) -> Option<Phase> {
        self.center.get(self.id).map(|n| n.phase)
    }

    pub fn dismiss(&self) -> bool {
        self.center.dismiss(self.id)
    }
}

impl std::fmt::Debug for NotificationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHandle").field("id", &self.id).finish()
    }
}
