use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};

use super::models::Listing;
use crate::common::{ListingId, UserId};
use crate::kernel::{BaseListingRepository, StoreError};

/// Listing access against Postgres.
///
/// Postgres has no per-document rules, so ownership of deletes is enforced in
/// the statement itself.
#[derive(Clone)]
pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseListingRepository for PgListingRepository {
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Listing>, StoreError> {
        let listings = Listing::find_by_owner(owner_id, &self.pool).await?;
        debug!(%owner_id, count = listings.len(), "listings fetched");
        Ok(listings)
    }

    async fn get_by_id(&self, listing_id: ListingId) -> Result<Listing, StoreError> {
        Listing::find_by_id(listing_id, &self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("listing {}", listing_id)))
    }

    async fn remove(&self, actor: UserId, listing_id: ListingId) -> Result<(), StoreError> {
        if Listing::delete_owned(listing_id, actor, &self.pool).await? == 1 {
            debug!(%listing_id, %actor, "listing removed");
            return Ok(());
        }

        // Nothing deleted: tell a missing row apart from someone else's row
        match Listing::find_owner(listing_id, &self.pool).await? {
            Some(owner_id) => {
                warn!(%listing_id, %actor, %owner_id, "remove rejected, actor is not the owner");
                Err(StoreError::PermissionDenied(format!(
                    "user {} does not own listing {}",
                    actor, listing_id
                )))
            }
            None => Err(StoreError::NotFound(format!("listing {}", listing_id))),
        }
    }
}
