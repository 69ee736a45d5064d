use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use super::SuperuserOperations;
use crate::notifications::NotificationKind;
use crate::support::errors::{AppResult, DomainError};

pub const BACKUP_ENDPOINT: &str = "/superuser/api/backup/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub size: String,
}

#[derive(Debug, Deserialize)]
struct BackupPayload {
    #[serde(default)]
    backup_info: Option<BackupInfo>,
}

impl SuperuserOperations {
    /// Request a full backup. Only one backup runs at a time.
    pub async fn backup(&self) -> AppResult<Option<BackupInfo>> {
        let Some(_token) = self.backup_guard.try_begin() else {
            self.notifications.warning("Ya hay un backup en progreso");
            return Err(DomainError::InProgress(self.backup_guard.label()).into());
        };

        let confirmed = self
            .dialogs
            .confirm(
                "Backup del Sistema",
                "¿Estás seguro de que deseas realizar un backup completo?",
            )
            .await;
        if !confirmed {
            return Err(DomainError::Cancelled.into());
        }

        let result = self
            .client
            .post_json::<_, BackupPayload>(BACKUP_ENDPOINT, &json!({ "tipo": "completo" }))
            .await
            .and_then(|envelope| envelope.into_result());

        match result {
            Ok(payload) => {
                info!(backup = ?payload.backup_info, "Backup completed");
                self.notifications.success("Backup completado exitosamente");
                if let Some(info) = &payload.backup_info {
                    self.notifications.show(
                        format!("Backup creado: {} ({})", info.filename, info.size),
                        NotificationKind::Success,
                        Some(Duration::from_millis(5000)),
                    );
                }
                Ok(payload.backup_info)
            }
            Err(e) => {
                error!(kind = %e.kind, error = %e, "Backup failed");
                self.notifications
                    .error(format!("Error al realizar backup: {}", e));
                Err(e.into())
            }
        }
    }
}
