// TestDependencies - in-memory store doubles for testing
//
// Behave like the Postgres repositories (ordering, ownership checks,
// NotFound) and record every call so tests can assert on them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{BaseContactRepository, BaseListingRepository, StoreError};
use crate::common::{ContactId, ListingId, UserId};
use crate::domains::contacts::Contact;
use crate::domains::listings::{CreateListing, Listing};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Mock Listing Repository
// =============================================================================

/// Arguments captured from a remove call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveCall {
    pub actor: UserId,
    pub listing_id: ListingId,
}

#[derive(Default)]
struct ListingStoreState {
    listings: Vec<Listing>,
    list_calls: Vec<UserId>,
    remove_calls: Vec<RemoveCall>,
    list_failure: Option<StoreError>,
    remove_failure: Option<StoreError>,
    latency: HashMap<UserId, Duration>,
}

#[derive(Clone, Default)]
pub struct MockListingRepository {
    state: Arc<Mutex<ListingStoreState>>,
}

impl MockListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a listing with an explicit creation time
    pub fn insert(&self, input: CreateListing, created_at: DateTime<Utc>) -> Listing {
        let listing = Listing {
            id: ListingId::new(),
            owner_id: input.owner_id,
            name: input.name,
            description: input.description,
            category: input.category,
            condition: input.condition,
            price: input.price,
            currency: input.currency,
            location: input.location,
            image_urls: input.image_urls,
            created_at,
        };
        lock(&self.state).listings.push(listing.clone());
        listing
    }

    /// Make every `list_by_owner`/`get_by_id` call fail with `error`
    pub fn fail_lists_with(&self, error: StoreError) {
        lock(&self.state).list_failure = Some(error);
    }

    /// Make every `remove` call fail with `error`
    pub fn fail_removes_with(&self, error: StoreError) {
        lock(&self.state).remove_failure = Some(error);
    }

    /// Delay `list_by_owner` for one owner (uses tokio time, so pausable)
    pub fn with_latency(self, owner_id: UserId, latency: Duration) -> Self {
        lock(&self.state).latency.insert(owner_id, latency);
        self
    }

    pub fn list_calls(&self) -> Vec<UserId> {
        lock(&self.state).list_calls.clone()
    }

    pub fn remove_calls(&self) -> Vec<RemoveCall> {
        lock(&self.state).remove_calls.clone()
    }

    pub fn contains(&self, listing_id: ListingId) -> bool {
        lock(&self.state)
            .listings
            .iter()
            .any(|l| l.id == listing_id)
    }
}

#[async_trait]
impl BaseListingRepository for MockListingRepository {
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Listing>, StoreError> {
        let latency = {
            let mut state = lock(&self.state);
            state.list_calls.push(owner_id);
            state.latency.get(&owner_id).copied()
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let state = lock(&self.state);
        if let Some(error) = &state.list_failure {
            return Err(error.clone());
        }

        let mut listings: Vec<Listing> = state
            .listings
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn get_by_id(&self, listing_id: ListingId) -> Result<Listing, StoreError> {
        let state = lock(&self.state);
        if let Some(error) = &state.list_failure {
            return Err(error.clone());
        }
        state
            .listings
            .iter()
            .find(|l| l.id == listing_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("listing {}", listing_id)))
    }

    async fn remove(&self, actor: UserId, listing_id: ListingId) -> Result<(), StoreError> {
        let mut state = lock(&self.state);
        state.remove_calls.push(RemoveCall { actor, listing_id });
        if let Some(error) = &state.remove_failure {
            return Err(error.clone());
        }

        let position = state
            .listings
            .iter()
            .position(|l| l.id == listing_id)
            .ok_or_else(|| StoreError::NotFound(format!("listing {}", listing_id)))?;
        if state.listings[position].owner_id != actor {
            return Err(StoreError::PermissionDenied(format!(
                "user {} does not own listing {}",
                actor, listing_id
            )));
        }
        state.listings.remove(position);
        Ok(())
    }
}

// =============================================================================
// Mock Contact Repository
// =============================================================================

#[derive(Default)]
struct ContactStoreState {
    contacts: Vec<Contact>,
    calls: Vec<UserId>,
    failure: Option<StoreError>,
}

#[derive(Clone, Default)]
pub struct MockContactRepository {
    state: Arc<Mutex<ContactStoreState>>,
}

impl MockContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contact(self, owner_id: UserId, contact_type: &str, value: &str) -> Self {
        lock(&self.state).contacts.push(Contact {
            id: ContactId::new(),
            owner_id,
            contact_type: contact_type.to_string(),
            value: value.to_string(),
            created_at: Utc::now(),
        });
        self
    }

    pub fn fail_with(&self, error: StoreError) {
        lock(&self.state).failure = Some(error);
    }

    pub fn calls(&self) -> Vec<UserId> {
        lock(&self.state).calls.clone()
    }
}

#[async_trait]
impl BaseContactRepository for MockContactRepository {
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Contact>, StoreError> {
        let mut state = lock(&self.state);
        state.calls.push(owner_id);
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        Ok(state
            .contacts
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
