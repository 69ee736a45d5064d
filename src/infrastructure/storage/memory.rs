use dashmap::DashMap;

use super::LocalStore;
use crate::support::errors::InfraError;

/// Process-lifetime store, used by tests and one-shot commands
#[derive(Default)]
pub struct InMemoryStore {
    entries: DashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for InMemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), InfraError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), InfraError> {
        self.entries.remove(key);
        Ok(())
    }
}
