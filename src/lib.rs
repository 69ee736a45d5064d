//! # Biblioteca Universitaria administration console
//!
//! Headless core of the library's administration pages, driven against the
//! web application's JSON endpoints.
//!
//! ## Layout
//!
//! - **domain**: user records, filters and selection
//! - **application**: page controllers (users, forms, moderation, dashboard, operations)
//! - **infrastructure**: HTTP client, local storage, downloads
//! - **notifications**: banners and their lifecycle events
//! - **support**: errors, single-flight guards, page lifetime, tracing setup

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod shared;
pub mod support;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, resolve_config_path, AppConfig};
pub use notifications::{create_event_bus, NotificationCenter, NotificationKind, SharedEventBus};
pub use support::errors::{AppError, AppResult};
