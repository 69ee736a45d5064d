//! Stand-in for the users endpoints the web application does not expose yet

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::application::ports::UserGateway;
use crate::domain::{generate_sample_users, UserRecord, UserStatus};
use crate::infrastructure::http::ApiError;

/// Answers every request after a fixed latency; loads generated users.
pub struct SimulatedUserGateway {
    latency: Duration,
    sample_size: u32,
    rng: Mutex<StdRng>,
}

impl SimulatedUserGateway {
    pub fn new(latency: Duration, sample_size: u32) -> Self {
        Self::with_rng(latency, sample_size, StdRng::from_entropy())
    }

    pub fn with_rng(latency: Duration, sample_size: u32, rng: StdRng) -> Self {
        Self {
            latency,
            sample_size,
            rng: Mutex::new(rng),
        }
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl UserGateway for SimulatedUserGateway {
    async fn load_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        self.delay().await;
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let users = generate_sample_users(self.sample_size, &mut *rng, Utc::now());
        debug!(count = users.len(), "Sample users generated");
        Ok(users)
    }

    async fn set_status(&self, ids: &[u32], status: UserStatus) -> Result<(), ApiError> {
        self.delay().await;
        debug!(?ids, %status, "Status change accepted");
        Ok(())
    }

    async fn delete_users(&self, ids: &[u32]) -> Result<(), ApiError> {
        self.delay().await;
        debug!(?ids, "Deletion accepted");
        Ok(())
    }

    async fn reset_password(&self, id: u32) -> Result<(), ApiError> {
        self.delay().await;
        debug!(id, "Password reset accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn loads_configured_sample_after_latency() {
        let gateway = SimulatedUserGateway::with_rng(
            Duration::from_millis(1000),
            50,
            StdRng::seed_from_u64(7),
        );
        let started = tokio::time::Instant::now();
        let users = gateway.load_users().await.unwrap();
        assert_eq!(users.len(), 50);
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}
