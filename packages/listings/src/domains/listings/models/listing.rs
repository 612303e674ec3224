use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::currency::Currency;
use crate::common::auth::HasOwner;
use crate::common::{ListingId, UserId};

/// Listing - an item offered for sale by its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: ListingId,
    /// Set at creation, never updated
    pub owner_id: UserId,

    // Content
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,

    // Pricing
    pub price: Option<Decimal>,
    pub currency: String, // 'TL', 'USD', 'EUR'; anything else renders without a symbol

    pub location: Option<String>,
    pub image_urls: Vec<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new listing
#[derive(Debug, Clone)]
pub struct CreateListing {
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub price: Option<Decimal>,
    pub currency: String,
    pub location: Option<String>,
    pub image_urls: Vec<String>,
}

impl CreateListing {
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Self {
        Self {
            owner_id,
            name: name.into(),
            description: None,
            category: None,
            condition: None,
            price: None,
            currency: Currency::Tl.to_string(),
            location: None,
            image_urls: Vec::new(),
        }
    }
}

impl HasOwner for Listing {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

// =============================================================================
// Display
// =============================================================================

/// Render-ready view of a listing with the storefront's fallbacks applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingView {
    pub id: ListingId,
    pub name: String,
    pub price_label: String,
    pub location: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    /// `None` when the listing has no images, so no gallery is rendered
    pub image_urls: Option<Vec<String>>,
    /// "You are viewing your own listing."
    pub own_listing: bool,
}

fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

impl Listing {
    pub fn currency(&self) -> Currency {
        Currency::from_code(&self.currency)
    }

    /// `"<price> <symbol>"`, with `N/A` for a missing price. The symbol part is
    /// empty for unknown currencies.
    pub fn price_label(&self) -> String {
        let price = self
            .price
            .map(|p| p.normalize().to_string())
            .unwrap_or_else(|| "N/A".to_string());
        format!("{} {}", price, self.currency().symbol())
    }

    pub fn view(&self, own_listing: bool) -> ListingView {
        ListingView {
            id: self.id,
            name: or_fallback(Some(&self.name), "Product Name"),
            price_label: self.price_label(),
            location: or_fallback(self.location.as_deref(), "Location not specified"),
            description: or_fallback(self.description.as_deref(), "Product Description"),
            category: or_fallback(self.category.as_deref(), "Unknown"),
            condition: or_fallback(self.condition.as_deref(), "Not specified"),
            image_urls: if self.image_urls.is_empty() {
                None
            } else {
                Some(self.image_urls.clone())
            },
            own_listing,
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

impl Listing {
    /// Find listing by ID, `None` when it does not exist
    pub async fn find_by_id(id: ListingId, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find all listings of an owner, newest first
    pub async fn find_by_owner(owner_id: UserId, pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT *
            FROM listings
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Owner of a listing, `None` when the listing does not exist
    pub async fn find_owner(id: ListingId, pool: &PgPool) -> sqlx::Result<Option<UserId>> {
        sqlx::query_scalar::<_, UserId>("SELECT owner_id FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(input: CreateListing, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO listings (
                id, owner_id, name, description, category, condition,
                price, currency, location, image_urls
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(ListingId::new())
        .bind(input.owner_id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.category)
        .bind(input.condition)
        .bind(input.price)
        .bind(input.currency)
        .bind(input.location)
        .bind(input.image_urls)
        .fetch_one(pool)
        .await
    }

    /// Delete a listing only if `owner_id` owns it. Returns rows affected.
    pub async fn delete_owned(
        id: ListingId,
        owner_id: UserId,
        pool: &PgPool,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn listing() -> Listing {
        Listing {
            id: ListingId::new(),
            owner_id: UserId::new(),
            name: "Road bike".to_string(),
            description: None,
            category: None,
            condition: Some("  ".to_string()),
            price: Some(Decimal::from_str("1250.00").unwrap()),
            currency: "EUR".to_string(),
            location: Some("Kadıköy".to_string()),
            image_urls: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_price_label_uses_symbol() {
        assert_eq!(listing().price_label(), "1250 €");
    }

    #[test]
    fn test_missing_price_is_na() {
        let mut l = listing();
        l.price = None;
        l.currency = "XYZ".to_string();
        assert_eq!(l.price_label(), "N/A ");
    }

    #[test]
    fn test_view_applies_fallbacks() {
        let view = listing().view(false);
        assert_eq!(view.name, "Road bike");
        assert_eq!(view.location, "Kadıköy");
        assert_eq!(view.description, "Product Description");
        assert_eq!(view.category, "Unknown");
        assert_eq!(view.condition, "Not specified");
        assert_eq!(view.image_urls, None);
        assert!(!view.own_listing);
    }

    #[test]
    fn test_view_keeps_image_order() {
        let mut l = listing();
        l.image_urls = vec!["https://img/2.jpg".into(), "https://img/1.jpg".into()];
        let view = l.view(true);
        assert_eq!(
            view.image_urls,
            Some(vec!["https://img/2.jpg".to_string(), "https://img/1.jpg".to_string()])
        );
        assert!(view.own_listing);
    }
}
