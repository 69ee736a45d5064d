//! Superuser maintenance operations
//!
//! Backup, Excel export, security logs and system health. Every operation is a
//! request to the server; the console only tracks loading, success and failure.

mod backup;
mod export;
mod health;
mod logs;

pub use backup::{BackupInfo, BACKUP_ENDPOINT};
pub use export::{ExportTable, EXPORT_ENDPOINT};
pub use health::{
    render_report, service_class, usage_class, DatabaseInfo, ServerUsage, SystemStatus,
    SYSTEM_STATUS_ENDPOINT,
};
pub use logs::{level_badge, SecurityLog, SECURITY_LOGS_ENDPOINT};

use std::sync::Arc;

use crate::application::ports::Dialogs;
use crate::infrastructure::http::ApiClient;
use crate::infrastructure::Downloads;
use crate::notifications::NotificationCenter;
use crate::support::InFlight;

pub struct SuperuserOperations {
    client: ApiClient,
    dialogs: Arc<dyn Dialogs>,
    notifications: NotificationCenter,
    downloads: Downloads,
    backup_guard: InFlight,
    export_guard: InFlight,
}

impl SuperuserOperations {
    pub fn new(
        client: ApiClient,
        dialogs: Arc<dyn Dialogs>,
        notifications: NotificationCenter,
        downloads: Downloads,
    ) -> Self {
        Self {
            client,
            dialogs,
            notifications,
            downloads,
            backup_guard: InFlight::new("backup"),
            export_guard: InFlight::new("excel export"),
        }
    }

    pub fn downloads(&self) -> &Downloads {
        &self.downloads
    }
}
