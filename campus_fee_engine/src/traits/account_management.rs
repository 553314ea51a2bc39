use thiserror::Error;

use crate::db_types::User;

#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    async fn fetch_user_by_reg_no(&self, reg_no: &str) -> Result<Option<User>, AccountApiError>;

    /// Create the admin account if it does not exist yet. Idempotent: returns `true` only when a row was
    /// actually inserted. This is an explicit provisioning operation invoked at deployment time, not a side
    /// effect of server startup.
    async fn provision_admin(&self, reg_no: &str, name: &str) -> Result<bool, AccountApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("There is an internal database engine error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}
