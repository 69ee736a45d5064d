//! Notification surface
//!
//! Banners are attached to a lazily created container, fade out once their
//! duration elapses and are detached after the fade grace period. Every
//! transition goes out on the [`EventBus`] so a host can render them.

pub mod center;
pub mod event_bus;
pub mod events;
pub mod kind;

pub use center::{Notification, NotificationCenter, NotificationHandle, Phase};
pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{EventMessage, LifecycleEvent, NotificationEvent, ShownEvent};
pub use kind::NotificationKind;
