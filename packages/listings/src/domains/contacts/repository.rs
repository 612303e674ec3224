use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::models::Contact;
use crate::common::UserId;
use crate::kernel::{BaseContactRepository, StoreError};

/// Contact lookups against Postgres
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseContactRepository for PgContactRepository {
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Contact>, StoreError> {
        let contacts = Contact::find_by_owner(owner_id, &self.pool).await?;
        debug!(%owner_id, count = contacts.len(), "contacts fetched");
        Ok(contacts)
    }
}
