//! Dialog port: blocking questions put to the operator
//!
//! Hosts implement [`Dialogs`] (terminal prompts in the CLI, scripted answers in
//! tests). Every call suspends the calling flow until the operator answers.

use async_trait::async_trait;

use crate::infrastructure::http::{ApiError, ApiErrorKind};

/// Which button closed a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Confirm,
    Deny,
    Dismissed,
}

/// Tailored dialog for a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDialog {
    pub kind: ApiErrorKind,
    pub title: &'static str,
    pub text: String,
    pub confirm_label: &'static str,
    /// Only connection failures offer a second action
    pub deny_label: Option<&'static str>,
}

impl FailureDialog {
    pub fn for_error(err: &ApiError) -> Self {
        match err.kind {
            ApiErrorKind::Permission => Self {
                kind: err.kind,
                title: "Sin Permisos",
                text: "No tiene permisos para realizar esta acción. Su sesión puede haber expirado."
                    .to_string(),
                confirm_label: "Iniciar sesión",
                deny_label: None,
            },
            ApiErrorKind::Server | ApiErrorKind::Decode => Self {
                kind: err.kind,
                title: "Error del Servidor",
                text: "Error interno del servidor. El problema es temporal.".to_string(),
                confirm_label: "Reportar problema",
                deny_label: None,
            },
            ApiErrorKind::Validation | ApiErrorKind::Rejected => Self {
                kind: err.kind,
                title: "Error del servidor",
                text: err.message.clone(),
                confirm_label: "Intentar nuevamente",
                deny_label: None,
            },
            ApiErrorKind::Network => Self {
                kind: err.kind,
                title: "Error de Conexión",
                text: "No se pudo conectar con el servidor".to_string(),
                confirm_label: "Reintentar",
                deny_label: Some("Guardar borrador"),
            },
        }
    }

    pub fn offers_retry(&self) -> bool {
        self.kind == ApiErrorKind::Network
    }
}

#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Yes/no question; `true` when confirmed
    async fn confirm(&self, title: &str, text: &str) -> bool;

    /// Free-text question; `None` when cancelled
    async fn prompt(&self, title: &str, placeholder: &str) -> Option<String>;

    /// Informational message with a single button
    async fn alert(&self, title: &str, text: &str);

    async fn failure(&self, dialog: &FailureDialog) -> DialogChoice;
}
