use async_trait::async_trait;

use crate::domain::{UserRecord, UserStatus};
use crate::infrastructure::http::ApiError;

/// Server side of the users-management table.
///
/// Mutations are all-or-nothing: an `Err` means no record changed.
#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn load_users(&self) -> Result<Vec<UserRecord>, ApiError>;

    async fn set_status(&self, ids: &[u32], status: UserStatus) -> Result<(), ApiError>;

    async fn delete_users(&self, ids: &[u32]) -> Result<(), ApiError>;

    async fn reset_password(&self, id: u32) -> Result<(), ApiError>;
}
