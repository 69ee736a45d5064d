use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;
use tracing::{error, info};

use super::SuperuserOperations;
use crate::support::errors::{AppResult, DomainError};

pub const EXPORT_ENDPOINT: &str = "/superuser/api/exportar-excel/";

/// Tables offered by the export dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExportTable {
    Users,
    Books,
    Loans,
    Employees,
}

impl ExportTable {
    /// Checked when the dialog opens
    pub const DEFAULT_SELECTION: [ExportTable; 3] =
        [ExportTable::Users, ExportTable::Books, ExportTable::Loans];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTable::Users => "users",
            ExportTable::Books => "books",
            ExportTable::Loans => "loans",
            ExportTable::Employees => "employees",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportTable::Users => "Usuarios",
            ExportTable::Books => "Libros",
            ExportTable::Loans => "Préstamos",
            ExportTable::Employees => "Empleados",
        }
    }
}

impl fmt::Display for ExportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" | "usuarios" => Ok(ExportTable::Users),
            "books" | "libros" => Ok(ExportTable::Books),
            "loans" | "prestamos" => Ok(ExportTable::Loans),
            "employees" | "empleados" => Ok(ExportTable::Employees),
            other => Err(format!("unknown table: {}", other)),
        }
    }
}

impl SuperuserOperations {
    /// Download the selected tables as `biblioteca_export_YYYY-MM-DD.xlsx`.
    pub async fn export_excel(&self, tables: &[ExportTable], today: NaiveDate) -> AppResult<PathBuf> {
        let Some(_token) = self.export_guard.try_begin() else {
            self.notifications.warning("Ya hay una exportación en progreso");
            return Err(DomainError::InProgress(self.export_guard.label()).into());
        };

        let mut tables = tables.to_vec();
        tables.sort();
        tables.dedup();
        if tables.is_empty() {
            self.notifications
                .warning("Selecciona al menos una tabla para exportar");
            return Err(DomainError::Validation("no tables selected".to_string()).into());
        }

        let names: Vec<&str> = tables.iter().map(ExportTable::as_str).collect();
        let bytes = match self
            .client
            .post_for_bytes(EXPORT_ENDPOINT, &json!({ "tablas": names }))
            .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(kind = %e.kind, error = %e, "Excel export failed");
                self.notifications.error("Error al descargar archivo Excel");
                return Err(e.into());
            }
        };

        match self.downloads.save("biblioteca_export", "xlsx", today, &bytes) {
            Ok(path) => {
                info!(tables = ?names, path = %path.display(), "Excel export saved");
                self.notifications
                    .success("Archivo Excel descargado exitosamente");
                Ok(path)
            }
            Err(e) => {
                error!(error = %e, "Could not write Excel export");
                self.notifications.error("Error al descargar archivo Excel");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::harness;
    use super::*;
    use crate::support::errors::AppError;
    use crate::test_support::ScriptedDialogs;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[tokio::test]
    async fn export_saves_dated_workbook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let router = {
            let seen = seen.clone();
            Router::new().route(
                EXPORT_ENDPOINT,
                post(move |Json(body): Json<Value>| {
                    let seen = seen.clone();
                    async move {
                        seen.lock().unwrap().push(body);
                        b"PK\x03\x04xlsx".to_vec()
                    }
                }),
            )
        };
        let h = harness(router, ScriptedDialogs::confirming()).await;

        let path = h
            .ops
            .export_excel(&[ExportTable::Loans, ExportTable::Users, ExportTable::Users], today())
            .await
            .unwrap();
        assert!(path.ends_with("biblioteca_export_2024-06-10.xlsx"));
        assert!(path.starts_with(h.dir.path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04xlsx");
        assert_eq!(seen.lock().unwrap()[0], json!({"tablas": ["users", "loans"]}));
        assert_eq!(h.center.list()[0].message, "Archivo Excel descargado exitosamente");
    }

    #[tokio::test]
    async fn empty_selection_is_rejected_locally() {
        let h = harness(Router::new(), ScriptedDialogs::confirming()).await;
        let err = h.ops.export_excel(&[], today()).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        assert!(!h.ops.downloads().dir().exists());
    }

    #[tokio::test]
    async fn server_error_writes_nothing() {
        let router = Router::new().route(
            EXPORT_ENDPOINT,
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let h = harness(router, ScriptedDialogs::confirming()).await;
        assert!(h
            .ops
            .export_excel(&ExportTable::DEFAULT_SELECTION, today())
            .await
            .is_err());
        assert_eq!(h.center.list()[0].message, "Error al descargar archivo Excel");
        assert!(!h.ops.downloads().dir().exists());
    }

    #[test]
    fn tables_parse_in_both_languages() {
        assert_eq!("libros".parse(), Ok(ExportTable::Books));
        assert_eq!("employees".parse(), Ok(ExportTable::Employees));
        assert!("revistas".parse::<ExportTable>().is_err());
    }
}
