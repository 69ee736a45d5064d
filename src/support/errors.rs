use thiserror::Error;

use crate::infrastructure::http::ApiError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("No users selected")]
    EmptySelection,

    #[error("{0} already in progress")]
    InProgress(&'static str),

    #[error("Cancelled by operator")]
    Cancelled,
}

impl DomainError {
    pub fn user_not_found(id: u32) -> Self {
        DomainError::NotFound {
            entity: "user",
            field: "id",
            value: id.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AppError {
    /// The operator declined a confirmation; callers usually treat this as a no-op.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::Cancelled))
    }
}

pub type AppResult<T> = Result<T, AppError>;
