//! Superuser dashboard
//!
//! Statistics counters refreshed on a timer for as long as the page is mounted,
//! plus the password-policy and system-configuration settings forms.

mod counter;
mod settings;
mod stats;

pub use counter::CounterAnimation;
pub use settings::{PasswordPolicy, SystemConfig, PASSWORD_POLICY_ENDPOINT, SYSTEM_CONFIG_ENDPOINT};
pub use stats::DashboardStats;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::DashboardConfig;
use crate::infrastructure::http::ApiClient;
use crate::notifications::NotificationCenter;
use crate::support::errors::AppResult;
use crate::support::UnmountSignal;

use stats::StatsPayload;

pub const STATS_ENDPOINT: &str = "/superuser/api/estadisticas/";

#[derive(Debug, Default)]
struct DashboardState {
    stats: Option<DashboardStats>,
    last_update: Option<DateTime<Local>>,
    password_policy: Option<PasswordPolicy>,
    system_config: Option<SystemConfig>,
}

pub struct Dashboard {
    client: ApiClient,
    notifications: NotificationCenter,
    config: DashboardConfig,
    state: Mutex<DashboardState>,
    unmount: UnmountSignal,
}

impl Dashboard {
    pub fn new(client: ApiClient, notifications: NotificationCenter, config: DashboardConfig) -> Self {
        Self {
            client,
            notifications,
            config,
            state: Mutex::new(DashboardState::default()),
            unmount: UnmountSignal::new(),
        }
    }

    pub fn unmount_signal(&self) -> UnmountSignal {
        self.unmount.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn stats(&self) -> Option<DashboardStats> {
        self.state().stats
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.state().last_update
    }

    /// "Última actualización: HH:MM:SS"
    pub fn last_update_label(&self) -> Option<String> {
        self.last_update()
            .map(|at| format!("Última actualización: {}", at.format("%H:%M:%S")))
    }

    pub fn password_policy(&self) -> Option<PasswordPolicy> {
        self.state().password_policy.clone()
    }

    pub fn system_config(&self) -> Option<SystemConfig> {
        self.state().system_config.clone()
    }

    // ── Statistics ──────────────────────────────────────────────

    /// Fetch the counters and return their animations from the previous values.
    pub async fn load_statistics(&self) -> AppResult<Vec<(&'static str, CounterAnimation)>> {
        let payload: StatsPayload = self.client.get_envelope(STATS_ENDPOINT).await?;
        let fresh = payload.data;
        let duration = Duration::from_millis(self.config.counter_animation_ms);

        let previous = {
            let mut state = self.state();
            let previous = state.stats.replace(fresh).unwrap_or_default();
            state.last_update = Some(Local::now());
            previous
        };
        debug!(?fresh, "Statistics updated");

        Ok(previous
            .counters()
            .into_iter()
            .zip(fresh.counters())
            .map(|((key, from), (_, to))| {
                (key, CounterAnimation::new(from as i64, to as i64, duration))
            })
            .collect())
    }

    /// Initial load. A failure is reported to the operator once.
    pub async fn mount(&self) -> Option<Vec<(&'static str, CounterAnimation)>> {
        match self.load_statistics().await {
            Ok(counters) => Some(counters),
            Err(e) => {
                error!(error = %e, "Error loading dashboard data");
                self.notifications.error("Error cargando datos del dashboard");
                None
            }
        }
    }

    /// Refresh the statistics every `stats_refresh_secs` until unmount.
    ///
    /// Refresh failures are only logged.
    pub fn spawn_polling(self: &Arc<Self>) -> JoinHandle<()> {
        let dashboard = Arc::clone(self);
        let period = Duration::from_secs(self.config.stats_refresh_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = dashboard.unmount.wait() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = dashboard.load_statistics().await {
                            warn!(error = %e, "Statistics refresh failed");
                        }
                    }
                }
            }
            info!("Statistics polling stopped");
        })
    }

    pub fn unmount(&self) {
        self.unmount.trigger();
    }

    // ── Settings ────────────────────────────────────────────────

    pub async fn save_password_policy(&self, policy: PasswordPolicy) -> bool {
        let saved = self
            .save(
                PASSWORD_POLICY_ENDPOINT,
                &policy,
                policy.check(),
                "Políticas de contraseña actualizadas exitosamente",
            )
            .await;
        if saved {
            self.state().password_policy = Some(policy);
        }
        saved
    }

    pub async fn save_system_config(&self, config: SystemConfig) -> bool {
        let saved = self
            .save(
                SYSTEM_CONFIG_ENDPOINT,
                &config,
                config.check(),
                "Configuración del sistema actualizada exitosamente",
            )
            .await;
        if saved {
            self.state().system_config = Some(config);
        }
        saved
    }

    async fn save<T: Serialize>(
        &self,
        endpoint: &str,
        body: &T,
        local_check: Result<(), String>,
        success_message: &str,
    ) -> bool {
        let result = match local_check {
            Ok(()) => self
                .client
                .post_json::<_, serde_json::Value>(endpoint, body)
                .await
                .and_then(|envelope| envelope.into_result().map(|_| ()))
                .map_err(|e| e.to_string()),
            Err(message) => Err(message),
        };

        match result {
            Ok(()) => {
                info!(endpoint, "Settings saved");
                self.notifications.success(success_message);
                true
            }
            Err(message) => {
                warn!(endpoint, error = %message, "Settings not saved");
                self.notifications
                    .error(format!("Error al guardar configuración: {}", message));
                false
            }
        }
    }
}
