//! Test fixtures for creating test data.
//!
//! Listings go through the model methods; contacts have no write path in the
//! crate, so they are inserted directly.

use anyhow::Result;
use chrono::{DateTime, Utc};
use listings_core::common::{ContactId, UserId};
use listings_core::domains::listings::{CreateListing, Listing};
use sqlx::PgPool;

/// Create a listing and pin its creation time
pub async fn create_listing_at(
    pool: &PgPool,
    owner_id: UserId,
    name: &str,
    created_at: DateTime<Utc>,
) -> Result<Listing> {
    let listing = Listing::create(CreateListing::new(owner_id, name), pool).await?;

    let listing = sqlx::query_as::<_, Listing>(
        "UPDATE listings SET created_at = $2 WHERE id = $1 RETURNING *",
    )
    .bind(listing.id)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    Ok(listing)
}

pub async fn create_contact(
    pool: &PgPool,
    owner_id: UserId,
    contact_type: &str,
    value: &str,
) -> Result<ContactId> {
    let id = ContactId::new();
    sqlx::query("INSERT INTO contacts (id, owner_id, contact_type, value) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(owner_id)
        .bind(contact_type)
        .bind(value)
        .execute(pool)
        .await?;
    Ok(id)
}
