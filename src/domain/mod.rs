//! Domain types of the administration console
//!
//! Plain data and pure predicates; no I/O.

pub mod user;

pub use user::{
    generate_sample_users, Badge, DateWindow, FilterState, HeaderCheckbox, SelectionSet,
    UserDetails, UserRecord, UserStatus, UserType,
};

pub use crate::support::errors::DomainError;
