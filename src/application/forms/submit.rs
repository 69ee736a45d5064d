//! Staff form submission

use std::sync::Arc;

use tracing::{info, warn};

use super::fields::{StaffForm, FormKind};
use super::validation::{FormReport, ValidationPhase};
use crate::application::ports::{DialogChoice, Dialogs, FailureDialog};
use crate::infrastructure::http::{ApiClient, ApiError, FieldErrors};
use crate::infrastructure::storage::{SharedLocalStore, ADMIN_DRAFT_KEY};
use crate::notifications::NotificationCenter;
use crate::support::errors::{AppResult, DomainError};
use crate::support::InFlight;

/// How a submission ended
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Local checks failed; nothing was sent
    Invalid(FormReport),
    /// Server created the account
    Created,
    /// Server rejected individual fields
    FieldErrors(FieldErrors),
    /// Server rejected the request as a whole
    Rejected(String),
    /// Request failed; the operator chose not to retry
    Failed(ApiError),
    /// Request failed and the form was saved under `adminDraft`
    DraftSaved,
}

pub struct StaffFormSubmitter {
    client: ApiClient,
    dialogs: Arc<dyn Dialogs>,
    notifications: NotificationCenter,
    store: SharedLocalStore,
    guard: InFlight,
}

impl StaffFormSubmitter {
    pub fn new(
        client: ApiClient,
        dialogs: Arc<dyn Dialogs>,
        notifications: NotificationCenter,
        store: SharedLocalStore,
    ) -> Self {
        Self {
            client,
            dialogs,
            notifications,
            store,
            guard: InFlight::new("staff form submission"),
        }
    }

    pub async fn submit(&self, form: &StaffForm) -> AppResult<SubmitOutcome> {
        let _token = self
            .guard
            .try_begin()
            .ok_or(DomainError::InProgress(self.guard.label()))?;

        let report = form.check();
        if !report.is_valid() {
            self.explain_invalid(&report).await;
            return Ok(SubmitOutcome::Invalid(report));
        }
        for warning in &report.warnings {
            self.notifications.warning(warning.clone());
        }

        let fields = form.to_fields();
        loop {
            let response = self
                .client
                .post_form::<serde_json::Value>(form.kind.endpoint(), &fields)
                .await;

            let envelope = match response {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(kind = %e.kind, error = %e, form = %form.kind, "Staff form request failed");
                    let dialog = FailureDialog::for_error(&e);
                    match self.dialogs.failure(&dialog).await {
                        DialogChoice::Confirm if dialog.offers_retry() => {
                            info!("Retrying staff form submission");
                            continue;
                        }
                        DialogChoice::Deny if dialog.deny_label.is_some() => {
                            self.save_draft(form)?;
                            return Ok(SubmitOutcome::DraftSaved);
                        }
                        _ => return Ok(SubmitOutcome::Failed(e)),
                    }
                }
            };

            if envelope.success {
                info!(form = %form.kind, username = %form.username, "Staff account created");
                self.dialogs
                    .alert(
                        form.kind.success_title(),
                        "El usuario debe cambiar su contraseña en el primer inicio de sesión.",
                    )
                    .await;
                self.notifications
                    .success(format!("{} creado exitosamente", form.kind.label()));
                return Ok(SubmitOutcome::Created);
            }

            if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
                self.notifications.show_form_errors(&errors);
                self.dialogs
                    .alert(
                        "Errores en el formulario",
                        &format!(
                            "Se encontraron {} errores en el formulario. Por favor, corrija los campos marcados en rojo.",
                            errors.len()
                        ),
                    )
                    .await;
                return Ok(SubmitOutcome::FieldErrors(errors));
            }

            let message = envelope
                .error
                .unwrap_or_else(|| form.kind.unknown_error().to_string());
            self.dialogs.alert("Error del servidor", &message).await;
            return Ok(SubmitOutcome::Rejected(message));
        }
    }

    async fn explain_invalid(&self, report: &FormReport) {
        match report.phase {
            Some(ValidationPhase::Required) => {
                let text = format!(
                    "Por favor, complete los siguientes campos obligatorios: {}",
                    report.labels().join(", ")
                );
                self.dialogs
                    .alert("Campos obligatorios faltantes", &text)
                    .await;
            }
            _ => {
                self.dialogs
                    .alert(
                        "Errores de formato",
                        "Por favor, corrija los campos marcados en rojo antes de continuar.",
                    )
                    .await;
            }
        }
    }

    fn save_draft(&self, form: &StaffForm) -> AppResult<()> {
        let json = serde_json::to_string(form).map_err(crate::support::InfraError::from)?;
        self.store.set_item(ADMIN_DRAFT_KEY, &json)?;
        self.notifications.info("Borrador guardado localmente");
        Ok(())
    }
}

/// Draft saved by a failed submission, if any
pub fn load_draft(store: &SharedLocalStore, kind: FormKind) -> Option<StaffForm> {
    let raw = store.get_item(ADMIN_DRAFT_KEY)?;
    match serde_json::from_str::<StaffForm>(&raw) {
        Ok(mut form) => {
            form.kind = kind;
            Some(form)
        }
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable form draft");
            None
        }
    }
}
