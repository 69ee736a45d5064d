pub mod errors;
pub mod in_flight;
pub mod lifecycle;
pub mod telemetry;

pub use errors::{AppError, AppResult, DomainError, InfraError};
pub use in_flight::{InFlight, InFlightToken};
pub use lifecycle::UnmountSignal;
pub use telemetry::init_tracing;
