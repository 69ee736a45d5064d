//! Ports to the operator and to the server

pub mod dialogs;
pub mod user_gateway;

pub use dialogs::{DialogChoice, Dialogs, FailureDialog};
pub use user_gateway::UserGateway;
