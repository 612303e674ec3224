// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Controllers take them as `Arc<dyn ...>` so tests can swap in the doubles
// from `test_dependencies`.
//
// Naming convention: Base* for trait names (e.g., BaseListingRepository)

use async_trait::async_trait;

use super::StoreError;
use crate::common::{ListingId, UserId};
use crate::domains::contacts::Contact;
use crate::domains::listings::Listing;

// =============================================================================
// Listing Repository Trait
// =============================================================================

#[async_trait]
pub trait BaseListingRepository: Send + Sync {
    /// All listings of `owner_id`, newest `created_at` first.
    /// An owner without listings is `Ok(vec![])`, never an error.
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Listing>, StoreError>;

    /// `NotFound` when the listing does not exist, `Fetch` on store failure
    async fn get_by_id(&self, listing_id: ListingId) -> Result<Listing, StoreError>;

    /// Remove a listing on behalf of `actor`. The store enforces ownership;
    /// contacts are owner-scoped and are left alone.
    async fn remove(&self, actor: UserId, listing_id: ListingId) -> Result<(), StoreError>;
}

// =============================================================================
// Contact Repository Trait
// =============================================================================

#[async_trait]
pub trait BaseContactRepository: Send + Sync {
    /// Contacts registered by `owner_id`, in no particular order.
    /// No contacts is `Ok(vec![])`.
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Contact>, StoreError>;
}

// =============================================================================
// Identity Provider Trait
// =============================================================================

/// Callback invoked with the current user (or `None` once signed out).
pub type IdentityListener = Box<dyn Fn(Option<UserId>) + Send + Sync>;

/// Source of the authenticated user. Identity issuance happens elsewhere.
pub trait BaseIdentityProvider: Send + Sync {
    /// Register a listener. Implementations call it once right away with the
    /// current user, then on every change until the subscription is released.
    fn subscribe(&self, listener: IdentityListener) -> Subscription;
}

/// Handle returned by [`BaseIdentityProvider::subscribe`].
///
/// Releasing it (explicitly or by drop) stops further notifications.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
