//! Local key/value storage implementations

mod file;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::InMemoryStore;
pub use traits::{LocalStore, SharedLocalStore, ADMIN_DRAFT_KEY, THEME_KEY};
