//! Browser-style key/value storage

use std::sync::Arc;

use crate::support::errors::InfraError;

/// Key used for the persisted colour scheme
pub const THEME_KEY: &str = "theme";
/// Key used for a failed administrator form saved as a draft
pub const ADMIN_DRAFT_KEY: &str = "adminDraft";

/// String-keyed, string-valued store surviving page reloads
pub trait LocalStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), InfraError>;
    fn remove_item(&self, key: &str) -> Result<(), InfraError>;
}

pub type SharedLocalStore = Arc<dyn LocalStore>;
