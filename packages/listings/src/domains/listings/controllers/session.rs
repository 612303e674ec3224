use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::{FetchTicket, ListingListController};
use crate::common::{ListingId, Notice, UserId, ViewState};
use crate::config::ControllerConfig;
use crate::domains::listings::models::Listing;
use crate::kernel::{BaseIdentityProvider, BaseListingRepository, StoreError, Subscription};

type SharedController = Arc<Mutex<ListingListController>>;
type PendingTasks = Arc<Mutex<Vec<JoinHandle<()>>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// "My listings" bound to an identity provider.
///
/// Subscribes exactly once on start. Every identity the provider reports
/// starts a fetch on the tokio runtime `start` was called from, even when the
/// provider notifies from another thread. Started outside a runtime, fetches
/// cannot run and the view goes to its error state instead of loading forever.
/// Results for a superseded identity are dropped by the controller.
/// `teardown` (or drop) releases the subscription and aborts in-flight fetches.
pub struct ListingListSession {
    controller: SharedController,
    repo: Arc<dyn BaseListingRepository>,
    pending: PendingTasks,
    subscription: Option<Subscription>,
}

impl ListingListSession {
    pub fn start(
        identity: &dyn BaseIdentityProvider,
        repo: Arc<dyn BaseListingRepository>,
        config: ControllerConfig,
    ) -> Self {
        let controller: SharedController =
            Arc::new(Mutex::new(ListingListController::new(config)));
        let pending: PendingTasks = Arc::new(Mutex::new(Vec::new()));
        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            warn!("listing session started outside a tokio runtime");
        }

        let listener = {
            let controller = Arc::downgrade(&controller);
            let pending = Arc::downgrade(&pending);
            let repo = Arc::clone(&repo);
            move |user: Option<UserId>| {
                on_identity(&controller, &pending, &repo, runtime.as_ref(), user)
            }
        };
        let subscription = identity.subscribe(Box::new(listener));

        Self {
            controller,
            repo,
            pending,
            subscription: Some(subscription),
        }
    }

    /// Wait until every fetch issued so far has been applied (or dropped)
    pub async fn settle(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = lock(&self.pending).drain(..).collect();
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    if !e.is_cancelled() {
                        warn!(error = %e, "listing fetch task failed");
                    }
                }
            }
        }
    }

    pub fn state(&self) -> ViewState<Vec<Listing>> {
        lock(&self.controller).state().clone()
    }

    pub fn notice(&self) -> Option<Notice> {
        lock(&self.controller).notice().cloned()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        lock(&self.controller).empty_message()
    }

    pub fn is_torn_down(&self) -> bool {
        lock(&self.controller).is_torn_down()
    }

    pub fn request_delete(&self, listing_id: ListingId) -> bool {
        lock(&self.controller).request_delete(listing_id)
    }

    pub fn confirmation_prompt(&self) -> Option<String> {
        lock(&self.controller).confirmation_prompt()
    }

    pub fn cancel_delete(&self) {
        lock(&self.controller).cancel_delete();
    }

    /// Confirm the pending delete and wait for the store. The lock is not
    /// held across the store call.
    pub async fn confirm_delete(&self) -> bool {
        let Some(ticket) = lock(&self.controller).confirm_delete() else {
            return false;
        };
        let result = self.repo.remove(ticket.actor, ticket.listing_id).await;
        lock(&self.controller).apply_delete(ticket, result)
    }

    pub fn teardown(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };
        subscription.unsubscribe();
        lock(&self.controller).teardown();
        for handle in lock(&self.pending).drain(..) {
            handle.abort();
        }
        debug!("listing list session torn down");
    }
}

impl Drop for ListingListSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn on_identity(
    controller: &Weak<Mutex<ListingListController>>,
    pending: &Weak<Mutex<Vec<JoinHandle<()>>>>,
    repo: &Arc<dyn BaseListingRepository>,
    runtime: Option<&Handle>,
    user: Option<UserId>,
) {
    let (Some(controller), Some(pending)) = (controller.upgrade(), pending.upgrade()) else {
        return;
    };
    let Some(ticket) = lock(&controller).set_identity(user) else {
        return;
    };

    let Some(runtime) = runtime else {
        error!(owner_id = %ticket.owner_id, "no async runtime, listing fetch cannot run");
        lock(&controller).apply_fetch(
            ticket,
            Err(StoreError::Fetch("no async runtime".to_string())),
        );
        return;
    };
    let handle = runtime.spawn(fetch(
        Arc::downgrade(&controller),
        Arc::clone(repo),
        ticket,
    ));

    let mut pending = lock(&pending);
    pending.retain(|h| !h.is_finished());
    pending.push(handle);
}

async fn fetch(
    controller: Weak<Mutex<ListingListController>>,
    repo: Arc<dyn BaseListingRepository>,
    ticket: FetchTicket,
) {
    let result = repo.list_by_owner(ticket.owner_id).await;
    match controller.upgrade() {
        Some(controller) => {
            lock(&controller).apply_fetch(ticket, result);
        }
        None => debug!(owner_id = %ticket.owner_id, "session gone, dropping listing fetch"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::listings::models::CreateListing;
    use crate::kernel::test_dependencies::MockListingRepository;
    use crate::kernel::LocalIdentityProvider;
    use chrono::Utc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_start_fetches_for_signed_in_user() {
        let owner = UserId::new();
        let repo = MockListingRepository::new();
        repo.insert(CreateListing::new(owner, "Desk lamp"), Utc::now());
        let identity = LocalIdentityProvider::signed_in(owner);

        let session =
            ListingListSession::start(&identity, Arc::new(repo.clone()), ControllerConfig::default());
        session.settle().await;

        assert_eq!(session.state().data().map(Vec::len), Some(1));
        assert_eq!(identity.listener_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identity_change_discards_slow_stale_fetch() {
        let first = UserId::new();
        let second = UserId::new();
        let repo = MockListingRepository::new().with_latency(first, Duration::from_secs(5));
        repo.insert(CreateListing::new(first, "first's listing"), Utc::now());
        let kept = repo.insert(CreateListing::new(second, "second's listing"), Utc::now());
        let identity = LocalIdentityProvider::signed_in(first);

        let session =
            ListingListSession::start(&identity, Arc::new(repo.clone()), ControllerConfig::default());
        identity.sign_in(second);
        session.settle().await;

        assert_eq!(repo.list_calls(), vec![first, second]);
        let listings = session.state();
        let ids: Vec<_> = listings.data().unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![kept.id]);
    }

    #[tokio::test]
    async fn test_sign_out_tears_down_controller() {
        let identity = LocalIdentityProvider::signed_in(UserId::new());
        let session = ListingListSession::start(
            &identity,
            Arc::new(MockListingRepository::new()),
            ControllerConfig::default(),
        );
        session.settle().await;

        identity.sign_out();
        assert!(session.is_torn_down());
    }

    #[tokio::test]
    async fn test_teardown_unsubscribes() {
        let identity = LocalIdentityProvider::signed_in(UserId::new());
        let repo = MockListingRepository::new();
        let session =
            ListingListSession::start(&identity, Arc::new(repo.clone()), ControllerConfig::default());
        session.settle().await;

        session.teardown();
        identity.sign_in(UserId::new());

        assert_eq!(identity.listener_count(), 0);
        assert_eq!(repo.list_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_finished_fetches_are_pruned() {
        let identity = LocalIdentityProvider::signed_in(UserId::new());
        let session = ListingListSession::start(
            &identity,
            Arc::new(MockListingRepository::new()),
            ControllerConfig::default(),
        );

        for _ in 0..5 {
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            identity.sign_in(UserId::new());
        }

        assert_eq!(lock(&session.pending).len(), 1);
        session.settle().await;
        assert!(lock(&session.pending).is_empty());
    }

    #[test]
    fn test_start_outside_runtime_reports_error() {
        let identity = LocalIdentityProvider::signed_in(UserId::new());
        let repo = MockListingRepository::new();

        let session =
            ListingListSession::start(&identity, Arc::new(repo.clone()), ControllerConfig::default());

        assert_eq!(session.state().error(), Some("Failed to fetch listings"));
        assert!(repo.list_calls().is_empty());
        assert!(lock(&session.pending).is_empty());
    }

    #[tokio::test]
    async fn test_delete_through_session() {
        let owner = UserId::new();
        let repo = MockListingRepository::new();
        let now = Utc::now();
        let a = repo.insert(CreateListing::new(owner, "a"), now);
        let b = repo.insert(CreateListing::new(owner, "b"), now - chrono::Duration::hours(1));
        let identity = LocalIdentityProvider::signed_in(owner);
        let session =
            ListingListSession::start(&identity, Arc::new(repo.clone()), ControllerConfig::default());
        session.settle().await;

        assert!(session.request_delete(a.id));
        assert!(session.confirm_delete().await);

        let ids: Vec<_> = session.state().data().unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![b.id]);
    }
}
