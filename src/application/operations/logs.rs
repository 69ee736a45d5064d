use serde::{Deserialize, Serialize};
use tracing::error;

use super::SuperuserOperations;
use crate::support::errors::AppResult;

pub const SECURITY_LOGS_ENDPOINT: &str = "/superuser/api/logs-seguridad/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityLog {
    pub timestamp: String,
    pub evento: String,
    pub usuario: String,
    pub ip: String,
    pub nivel: String,
}

impl SecurityLog {
    pub fn badge_class(&self) -> &'static str {
        level_badge(&self.nivel)
    }
}

/// Badge class for a log level, case-insensitive
pub fn level_badge(level: &str) -> &'static str {
    match level.to_uppercase().as_str() {
        "ERROR" => "bg-danger",
        "WARNING" => "bg-warning",
        "INFO" => "bg-success",
        "DEBUG" => "bg-secondary",
        _ => "bg-info",
    }
}

#[derive(Debug, Deserialize)]
struct LogsPayload {
    #[serde(default)]
    logs: Vec<SecurityLog>,
}

impl SuperuserOperations {
    pub async fn security_logs(&self) -> AppResult<Vec<SecurityLog>> {
        match self
            .client
            .get_envelope::<LogsPayload>(SECURITY_LOGS_ENDPOINT)
            .await
        {
            Ok(payload) => Ok(payload.logs),
            Err(e) => {
                error!(kind = %e.kind, error = %e, "Error loading security logs");
                self.notifications.error("Error al cargar logs de seguridad");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::harness;
    use super::*;
    use crate::test_support::ScriptedDialogs;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    #[test]
    fn badges_by_level() {
        assert_eq!(level_badge("error"), "bg-danger");
        assert_eq!(level_badge("Warning"), "bg-warning");
        assert_eq!(level_badge("INFO"), "bg-success");
        assert_eq!(level_badge("debug"), "bg-secondary");
        assert_eq!(level_badge("CRITICAL"), "bg-info");
    }

    #[tokio::test]
    async fn loads_logs_or_reports_failure() {
        let router = Router::new().route(
            SECURITY_LOGS_ENDPOINT,
            get(|| async {
                Json(json!({
                    "success": true,
                    "logs": [{
                        "timestamp": "2024-06-10 08:15:00",
                        "evento": "Inicio de sesión fallido",
                        "usuario": "admin",
                        "ip": "10.0.0.7",
                        "nivel": "WARNING"
                    }]
                }))
            }),
        );
        let h = harness(router, ScriptedDialogs::confirming()).await;
        let logs = h.ops.security_logs().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].badge_class(), "bg-warning");
        assert!(h.center.list().is_empty());

        let h = harness(Router::new(), ScriptedDialogs::confirming()).await;
        assert!(h.ops.security_logs().await.is_err());
        assert_eq!(h.center.list()[0].message, "Error al cargar logs de seguridad");
    }
}
