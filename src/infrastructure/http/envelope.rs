use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// A field may carry one message or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldMessages {
    One(String),
    Many(Vec<String>),
}

impl FieldMessages {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            FieldMessages::One(msg) => std::slice::from_ref(msg),
            FieldMessages::Many(list) => list,
        };
        slice.iter().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.iter().next()
    }
}

/// Server-reported errors keyed by form field name
pub type FieldErrors = BTreeMap<String, FieldMessages>;

/// `{success, error?, errors?, ...data}` response body.
///
/// Remaining keys are deserialized into `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn has_field_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// `data` on success, otherwise a [`Rejected`](super::ApiErrorKind::Rejected) error
    /// carrying the server's `error` text.
    pub fn into_result(self) -> Result<T, ApiError> {
        if self.success {
            return Ok(self.data);
        }
        let message = self
            .error
            .or(self.message)
            .unwrap_or_else(|| "Error desconocido".to_string());
        Err(ApiError::rejected(message))
    }
}
