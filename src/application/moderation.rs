//! Pre-registration moderation actions
//!
//! Each action asks the operator first (confirmation or reason prompt), posts to
//! the server and, on success, asks the host to reload the page after a delay.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use crate::application::ports::Dialogs;
use crate::config::ModerationConfig;
use crate::infrastructure::http::{ApiClient, ApiErrorKind};
use crate::notifications::{NotificationCenter, NotificationKind};
use crate::support::errors::{AppResult, DomainError};
use crate::support::InFlight;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
    Block,
    Activate,
}

impl ModerationAction {
    pub fn path(&self, id: u64) -> String {
        match self {
            ModerationAction::Approve => format!("/core/aprobar-preregistro/{}/", id),
            ModerationAction::Reject => format!("/core/rechazar-preregistro/{}/", id),
            ModerationAction::Block => format!("/core/bloquear-usuario/{}/", id),
            ModerationAction::Activate => format!("/core/activar-usuario/{}/", id),
        }
    }

    fn success(&self) -> (&'static str, NotificationKind) {
        match self {
            ModerationAction::Approve => ("Pre-registro aprobado exitosamente", NotificationKind::Success),
            ModerationAction::Reject => ("Pre-registro rechazado", NotificationKind::Warning),
            ModerationAction::Block => ("Usuario bloqueado exitosamente", NotificationKind::Warning),
            ModerationAction::Activate => ("Usuario reactivado exitosamente", NotificationKind::Success),
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Reject => "reject",
            ModerationAction::Block => "block",
            ModerationAction::Activate => "activate",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ModerationAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" | "aprobar" => Ok(ModerationAction::Approve),
            "reject" | "rechazar" => Ok(ModerationAction::Reject),
            "block" | "bloquear" => Ok(ModerationAction::Block),
            "activate" | "activar" => Ok(ModerationAction::Activate),
            other => Err(format!("unknown moderation action: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Accepted; the host should reload the listing after the delay
    ReloadAfter(Duration),
    /// Operator cancelled; nothing was sent
    Aborted,
    /// Server refused or the request failed; an error banner was shown
    Failed(String),
}

pub struct Moderation {
    client: ApiClient,
    dialogs: Arc<dyn Dialogs>,
    notifications: NotificationCenter,
    config: ModerationConfig,
    guard: InFlight,
}

impl Moderation {
    pub fn new(
        client: ApiClient,
        dialogs: Arc<dyn Dialogs>,
        notifications: NotificationCenter,
        config: ModerationConfig,
    ) -> Self {
        Self {
            client,
            dialogs,
            notifications,
            config,
            guard: InFlight::new("moderation"),
        }
    }

    pub async fn approve(&self, id: u64) -> AppResult<ModerationOutcome> {
        self.run(ModerationAction::Approve, id).await
    }

    pub async fn reject(&self, id: u64) -> AppResult<ModerationOutcome> {
        self.run(ModerationAction::Reject, id).await
    }

    pub async fn block(&self, id: u64) -> AppResult<ModerationOutcome> {
        self.run(ModerationAction::Block, id).await
    }

    pub async fn activate(&self, id: u64) -> AppResult<ModerationOutcome> {
        self.run(ModerationAction::Activate, id).await
    }

    pub async fn run(&self, action: ModerationAction, id: u64) -> AppResult<ModerationOutcome> {
        let _token = self
            .guard
            .try_begin()
            .ok_or(DomainError::InProgress(self.guard.label()))?;

        let body = match action {
            ModerationAction::Approve => {
                if !self.dialogs.confirm("Aprobar pre-registro", "¿Está seguro de aprobar este pre-registro?").await {
                    return Ok(ModerationOutcome::Aborted);
                }
                json!({})
            }
            ModerationAction::Activate => {
                if !self.dialogs.confirm("Reactivar usuario", "¿Está seguro de reactivar este usuario?").await {
                    return Ok(ModerationOutcome::Aborted);
                }
                json!({})
            }
            // An empty reason is allowed; only cancel aborts
            ModerationAction::Reject => match self.dialogs.prompt("Motivo del rechazo (opcional):", "").await {
                Some(motivo) => json!({ "motivo": motivo }),
                None => return Ok(ModerationOutcome::Aborted),
            },
            ModerationAction::Block => match self.dialogs.prompt("Motivo del bloqueo:", "").await {
                Some(motivo) if !motivo.trim().is_empty() => json!({ "motivo": motivo }),
                _ => return Ok(ModerationOutcome::Aborted),
            },
        };

        let error_duration = Some(Duration::from_millis(self.config.error_ms));
        let response = self
            .client
            .post_json::<_, serde_json::Value>(&action.path(id), &body)
            .await;

        match response {
            Ok(envelope) if envelope.success => {
                info!(%action, id, "Moderation action accepted");
                let (message, kind) = action.success();
                self.notifications
                    .show(message, kind, Some(Duration::from_millis(self.config.feedback_ms)));
                Ok(ModerationOutcome::ReloadAfter(Duration::from_millis(
                    self.config.reload_delay_ms,
                )))
            }
            Ok(envelope) => {
                let message = format!("Error: {}", envelope.error.unwrap_or_default());
                warn!(%action, id, %message, "Moderation action refused");
                self.notifications
                    .show(message.clone(), NotificationKind::Error, error_duration);
                Ok(ModerationOutcome::Failed(message))
            }
            Err(e) => {
                let message = match e.kind {
                    ApiErrorKind::Network | ApiErrorKind::Decode => {
                        format!("Error de conexión: {}", e.message)
                    }
                    _ => format!("Error: {}", e.message),
                };
                warn!(%action, id, kind = %e.kind, %message, "Moderation request failed");
                self.notifications
                    .show(message.clone(), NotificationKind::Error, error_duration);
                Ok(ModerationOutcome::Failed(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NotificationConfig, ServerConfig};
    use crate::test_support::{spawn_server, ScriptedDialogs};
    use axum::extract::Path;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;
    use std::sync::Mutex;

    type Seen = Arc<Mutex<Vec<(String, Value, String)>>>;

    fn router(seen: Seen) -> Router {
        let record = move |action: &'static str| {
            let seen = seen.clone();
            move |Path(id): Path<u64>, headers: HeaderMap, Json(body): Json<Value>| {
                let seen = seen.clone();
                async move {
                    let token = headers
                        .get("X-CSRFToken")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    seen.lock().unwrap().push((format!("{}/{}", action, id), body, token));
                    if id == 404 {
                        return Json(serde_json::json!({"success": false, "error": "Pre-registro no encontrado"}));
                    }
                    Json(serde_json::json!({"success": true}))
                }
            }
        };
        Router::new()
            .route("/core/aprobar-preregistro/{id}/", post(record("aprobar")))
            .route("/core/rechazar-preregistro/{id}/", post(record("rechazar")))
            .route("/core/bloquear-usuario/{id}/", post(record("bloquear")))
            .route("/core/activar-usuario/{id}/", post(record("activar")))
    }

    async fn moderation_page(dialogs: ScriptedDialogs) -> (Moderation, NotificationCenter, Seen) {
        let seen: Seen = Arc::default();
        let base_url = spawn_server(router(seen.clone())).await;
        let client = ApiClient::new(&ServerConfig {
            base_url,
            csrf_token: "csrf-abc".into(),
            request_timeout_secs: 5,
        })
        .unwrap();
        let center = NotificationCenter::new(NotificationConfig::default());
        let moderation = Moderation::new(client, Arc::new(dialogs), center.clone(), ModerationConfig::default());
        (moderation, center, seen)
    }

    #[tokio::test]
    async fn approve_posts_and_requests_reload() {
        let (moderation, center, seen) = moderation_page(ScriptedDialogs::confirming()).await;
        let outcome = moderation.approve(12).await.unwrap();

        assert_eq!(outcome, ModerationOutcome::ReloadAfter(Duration::from_millis(1500)));
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, "aprobar/12");
        assert_eq!(seen[0].2, "csrf-abc");
        let note = &center.list()[0];
        assert_eq!(note.message, "Pre-registro aprobado exitosamente");
        assert_eq!(note.duration, Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn declined_confirmation_sends_nothing() {
        let (moderation, center, seen) = moderation_page(ScriptedDialogs::declining()).await;
        assert_eq!(moderation.activate(3).await.unwrap(), ModerationOutcome::Aborted);
        assert!(seen.lock().unwrap().is_empty());
        assert!(center.list().is_empty());
    }

    #[tokio::test]
    async fn reject_reason_is_optional_but_cancel_aborts() {
        let (moderation, center, seen) =
            moderation_page(ScriptedDialogs::confirming().with_prompt(Some(""))).await;
        moderation.reject(7).await.unwrap();
        assert_eq!(seen.lock().unwrap()[0].1, serde_json::json!({"motivo": ""}));
        assert_eq!(center.list()[0].kind, NotificationKind::Warning);

        let (moderation, _, seen) = moderation_page(ScriptedDialogs::confirming().with_prompt(None)).await;
        assert_eq!(moderation.reject(7).await.unwrap(), ModerationOutcome::Aborted);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn block_requires_a_reason() {
        let (moderation, _, seen) =
            moderation_page(ScriptedDialogs::confirming().with_prompt(Some("   "))).await;
        assert_eq!(moderation.block(9).await.unwrap(), ModerationOutcome::Aborted);
        assert!(seen.lock().unwrap().is_empty());

        let (moderation, center, seen) =
            moderation_page(ScriptedDialogs::confirming().with_prompt(Some("Spam"))).await;
        assert!(matches!(moderation.block(9).await.unwrap(), ModerationOutcome::ReloadAfter(_)));
        assert_eq!(seen.lock().unwrap()[0].1["motivo"], "Spam");
        assert_eq!(center.list()[0].message, "Usuario bloqueado exitosamente");
    }

    #[tokio::test]
    async fn server_refusal_shows_error_for_five_seconds() {
        let (moderation, center, _) = moderation_page(ScriptedDialogs::confirming()).await;
        let outcome = moderation.approve(404).await.unwrap();
        assert_eq!(
            outcome,
            ModerationOutcome::Failed("Error: Pre-registro no encontrado".into())
        );
        let note = &center.list()[0];
        assert_eq!(note.kind, NotificationKind::Error);
        assert_eq!(note.duration, Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn transport_failure_is_a_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let client = ApiClient::new(&ServerConfig {
            base_url,
            csrf_token: String::new(),
            request_timeout_secs: 2,
        })
        .unwrap();
        let center = NotificationCenter::new(NotificationConfig::default());
        let moderation = Moderation::new(
            client,
            Arc::new(ScriptedDialogs::confirming()),
            center.clone(),
            ModerationConfig::default(),
        );

        match moderation.approve(1).await.unwrap() {
            ModerationOutcome::Failed(msg) => assert!(msg.starts_with("Error de conexión: ")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(center.list().len(), 1);
    }

    #[test]
    fn actions_parse_in_both_languages() {
        assert_eq!("approve".parse(), Ok(ModerationAction::Approve));
        assert_eq!("bloquear".parse(), Ok(ModerationAction::Block));
        assert!("borrar".parse::<ModerationAction>().is_err());
    }
}
