//! HTTP access to the web application

pub mod client;
pub mod envelope;
pub mod error;

pub use client::ApiClient;
pub use envelope::{Envelope, FieldErrors, FieldMessages};
pub use error::{ApiError, ApiErrorKind};
