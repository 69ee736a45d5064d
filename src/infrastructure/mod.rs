//! Infrastructure layer: HTTP, local storage, downloads

pub mod downloads;
pub mod gateway;
pub mod http;
pub mod storage;

pub use downloads::Downloads;
pub use gateway::SimulatedUserGateway;
pub use http::{ApiClient, ApiError, ApiErrorKind, Envelope, FieldErrors, FieldMessages};
pub use storage::{FileStore, InMemoryStore, LocalStore, SharedLocalStore};
