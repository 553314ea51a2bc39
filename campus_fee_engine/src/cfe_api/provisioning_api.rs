use log::*;

use crate::traits::{AccountApiError, AccountManagement};

/// Explicit, idempotent account provisioning, invoked once at deployment time (see the server's
/// `provision-admin` command). Deliberately decoupled from request-handling startup: starting the server never
/// creates accounts as a side effect.
pub struct ProvisioningApi<B> {
    db: B,
}

impl<B> ProvisioningApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ProvisioningApi<B>
where B: AccountManagement
{
    /// Returns `true` if the admin account was created, `false` if it already existed.
    pub async fn provision_admin(&self, reg_no: &str, name: &str) -> Result<bool, AccountApiError> {
        let created = self.db.provision_admin(reg_no, name).await?;
        if created {
            info!("🛂️ Admin account {reg_no} provisioned");
        } else {
            info!("🛂️ Admin account {reg_no} already exists. Nothing to do.");
        }
        Ok(created)
    }
}
