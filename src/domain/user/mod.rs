//! User records of the users-management table
//!
//! Contains the record type, the filter predicate and the selection set.

pub mod filter;
pub mod model;
pub mod sample;
pub mod selection;

pub use filter::{DateWindow, FilterState};
pub use model::{Badge, UserDetails, UserRecord, UserStatus, UserType};
pub use sample::generate_sample_users;
pub use selection::{HeaderCheckbox, SelectionSet};
