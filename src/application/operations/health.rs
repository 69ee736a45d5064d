use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use super::SuperuserOperations;
use crate::application::dashboard::{DashboardStats, STATS_ENDPOINT};
use crate::shared::format_thousands;
use crate::support::errors::AppResult;

pub const SYSTEM_STATUS_ENDPOINT: &str = "/superuser/api/estado-sistema/";

/// Resource usage in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerUsage {
    pub cpu: f64,
    pub memoria: f64,
    pub disco: f64,
    pub red: f64,
}

impl ServerUsage {
    pub fn bars(&self) -> [(&'static str, f64); 4] {
        [
            ("cpu", self.cpu),
            ("memoria", self.memoria),
            ("disco", self.disco),
            ("red", self.red),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseInfo {
    pub estado: Value,
    pub conexiones: Value,
    #[serde(rename = "tamaño")]
    pub tamano: Value,
    pub ultimo_backup: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStatus {
    pub servidor: Option<ServerUsage>,
    pub base_datos: Option<DatabaseInfo>,
    pub servicios: BTreeMap<String, String>,
    pub informacion: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    #[serde(default)]
    estado: SystemStatus,
}

/// Progress-bar class for a usage percentage
pub fn usage_class(percent: f64) -> &'static str {
    if percent < 50.0 {
        "bg-success"
    } else if percent < 80.0 {
        "bg-warning"
    } else {
        "bg-danger"
    }
}

/// Indicator class for a service state, case-insensitive
pub fn service_class(state: &str) -> &'static str {
    match state.to_lowercase().as_str() {
        "activo" => "text-success",
        "advertencia" => "text-warning",
        "error" | "inactivo" => "text-danger",
        _ => "text-secondary",
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Plain-text system report
pub fn render_report(
    status: &SystemStatus,
    stats: Option<&DashboardStats>,
    generated: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "REPORTE DEL SISTEMA - BIBLIOTECA UNIVERSITARIA");
    let _ = writeln!(out, "Generado: {}", generated.to_rfc3339());

    if !status.informacion.is_empty() {
        let _ = writeln!(out, "\n=== INFORMACIÓN GENERAL ===");
        for (key, value) in &status.informacion {
            let _ = writeln!(out, "{}: {}", key, plain(value));
        }
    }

    if let Some(stats) = stats {
        let _ = writeln!(out, "\n=== ESTADÍSTICAS ===");
        let _ = writeln!(out, "Total Usuarios: {}", format_thousands(stats.total_usuarios as i64));
        let _ = writeln!(out, "Total Empleados: {}", format_thousands(stats.total_empleados as i64));
        let _ = writeln!(out, "Total Libros: {}", format_thousands(stats.total_libros as i64));
        let _ = writeln!(out, "Préstamos Activos: {}", format_thousands(stats.prestamos_activos as i64));
    }

    if let Some(server) = &status.servidor {
        let _ = writeln!(out, "\n=== ESTADO DEL SERVIDOR ===");
        let _ = writeln!(out, "CPU: {}%", server.cpu);
        let _ = writeln!(out, "RAM: {}%", server.memoria);
        let _ = writeln!(out, "Disco: {}%", server.disco);
        let _ = writeln!(out, "Red: {}%", server.red);
    }

    if let Some(db) = &status.base_datos {
        let _ = writeln!(out, "\n=== BASE DE DATOS ===");
        let _ = writeln!(out, "Estado: {}", plain(&db.estado));
        let _ = writeln!(out, "Conexiones: {}", plain(&db.conexiones));
        let _ = writeln!(out, "Tamaño: {}", plain(&db.tamano));
        let _ = writeln!(out, "Último Backup: {}", plain(&db.ultimo_backup));
    }

    if !status.servicios.is_empty() {
        let _ = writeln!(out, "\n=== SERVICIOS ===");
        for (service, state) in &status.servicios {
            let mark = if state.eq_ignore_ascii_case("activo") { "✓" } else { "⚠" };
            let _ = writeln!(out, "{} {}: {}", mark, service, state);
        }
    }

    let _ = writeln!(out, "\nFin del reporte.");
    out
}

impl SuperuserOperations {
    pub async fn system_status(&self) -> AppResult<SystemStatus> {
        match self
            .client
            .get_envelope::<StatusPayload>(SYSTEM_STATUS_ENDPOINT)
            .await
        {
            Ok(payload) => {
                info!(services = payload.estado.servicios.len(), "System status refreshed");
                self.notifications.info("Estado del sistema actualizado");
                Ok(payload.estado)
            }
            Err(e) => {
                error!(kind = %e.kind, error = %e, "Error refreshing system status");
                self.notifications
                    .error(format!("Error al actualizar estado: {}", e));
                Err(e.into())
            }
        }
    }

    /// Save the current report as `system_report_YYYY-MM-DD.txt`.
    ///
    /// The statistics section is left out when the counters cannot be loaded.
    pub async fn download_report(&self, now: DateTime<Utc>, today: NaiveDate) -> AppResult<PathBuf> {
        let status = self.system_status().await?;
        let stats = match self
            .client
            .get_envelope::<StatsEnvelope>(STATS_ENDPOINT)
            .await
        {
            Ok(payload) => Some(payload.data),
            Err(e) => {
                warn!(error = %e, "Report generated without statistics");
                None
            }
        };

        let report = render_report(&status, stats.as_ref(), now);
        match self
            .downloads
            .save("system_report", "txt", today, report.as_bytes())
        {
            Ok(path) => {
                self.notifications.success("Reporte del sistema descargado");
                Ok(path)
            }
            Err(e) => {
                error!(error = %e, "Could not write system report");
                self.notifications.error("Error al descargar reporte");
                Err(e.into())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    data: DashboardStats,
}

#[cfg(test)]
mod tests {
    use super::super::testing::harness;
    use super::*;
    use crate::test_support::ScriptedDialogs;
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::TimeZone;
    use serde_json::json;

    fn status_router() -> Router {
        Router::new()
            .route(
                SYSTEM_STATUS_ENDPOINT,
                get(|| async {
                    Json(json!({
                        "success": true,
                        "estado": {
                            "servidor": {"cpu": 25, "memoria": 60, "disco": 85, "red": 15},
                            "base_datos": {"estado": "Conectado", "conexiones": "12/100", "tamaño": "2.4 GB", "ultimo_backup": null},
                            "servicios": {"Servidor Web": "activo", "Backup Service": "advertencia"},
                            "informacion": {"version": "v2.1.0"}
                        }
                    }))
                }),
            )
            .route(
                STATS_ENDPOINT,
                get(|| async { Json(json!({"success": true, "data": {"total_usuarios": 1234}})) }),
            )
    }

    #[test]
    fn thresholds() {
        assert_eq!(usage_class(49.9), "bg-success");
        assert_eq!(usage_class(50.0), "bg-warning");
        assert_eq!(usage_class(80.0), "bg-danger");
        assert_eq!(service_class("Activo"), "text-success");
        assert_eq!(service_class("advertencia"), "text-warning");
        assert_eq!(service_class("inactivo"), "text-danger");
        assert_eq!(service_class("error"), "text-danger");
        assert_eq!(service_class("desconocido"), "text-secondary");
    }

    #[tokio::test]
    async fn status_is_parsed_and_announced() {
        let h = harness(status_router(), ScriptedDialogs::confirming()).await;
        let status = h.ops.system_status().await.unwrap();
        let server = status.servidor.unwrap();
        assert_eq!(usage_class(server.disco), "bg-danger");
        assert_eq!(status.base_datos.unwrap().tamano, json!("2.4 GB"));
        assert_eq!(status.servicios["Backup Service"], "advertencia");
        assert_eq!(h.center.list()[0].message, "Estado del sistema actualizado");
    }

    #[tokio::test]
    async fn report_is_saved_with_date() {
        let h = harness(status_router(), ScriptedDialogs::confirming()).await;
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 9, 30, 0).unwrap();
        let path = h
            .ops
            .download_report(now, now.date_naive())
            .await
            .unwrap();
        assert!(path.ends_with("system_report_2024-06-10.txt"));

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("REPORTE DEL SISTEMA - BIBLIOTECA UNIVERSITARIA\n"));
        assert!(text.contains("Total Usuarios: 1.234"));
        assert!(text.contains("Disco: 85%"));
        assert!(text.contains("Último Backup: -"));
        assert!(text.contains("⚠ Backup Service: advertencia"));
        assert!(text.contains("✓ Servidor Web: activo"));
        assert!(text.trim_end().ends_with("Fin del reporte."));
        assert_eq!(
            h.center.list().last().unwrap().message,
            "Reporte del sistema descargado"
        );
    }

    #[tokio::test]
    async fn failed_status_reports_error() {
        let h = harness(Router::new(), ScriptedDialogs::confirming()).await;
        assert!(h.ops.system_status().await.is_err());
        assert!(h.center.list()[0]
            .message
            .starts_with("Error al actualizar estado: "));
    }
}
