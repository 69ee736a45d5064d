//! Users-management page

pub mod export;
pub mod management;

pub use export::users_to_xlsx;
pub use management::{Clock, UsersManagement};
