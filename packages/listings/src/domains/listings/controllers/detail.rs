use tracing::{debug, error, info, warn};

use super::{
    delete_failure_message, DeleteTicket, FetchTicket, LoadTicket, DELETE_SUCCESS_MESSAGE,
};
use crate::common::{
    ListingCapabilities, ListingId, NavigationIntent, Notice, OwnershipPolicy, UserId, ViewState,
};
use crate::config::ControllerConfig;
use crate::domains::contacts::{Contact, ContactOption};
use crate::domains::listings::commands::ListingCommand;
use crate::domains::listings::machines::{confirmation_message, ConfirmationGate};
use crate::domains::listings::models::{Listing, ListingView};
use crate::kernel::{BaseContactRepository, BaseListingRepository, StoreError};

const NOT_FOUND_MESSAGE: &str = "Listing not found";
const LOAD_FAILURE_MESSAGE: &str = "Failed to load listing";
const CONTACTS_FAILURE_MESSAGE: &str = "Failed to load contact information";
pub const NO_CONTACT_INFO_MESSAGE: &str = "User Has No Contact Info";

/// Contact channels of the listing owner, as seen by a non-owner
#[derive(Debug, Clone, PartialEq)]
pub enum ContactsState {
    /// Not fetched: the listing is not loaded yet, or the viewer owns it
    NotFetched,
    Loading,
    Available(Vec<Contact>),
    /// The owner registered no contacts. Success, not an error.
    NoContactInfo,
    Failed(String),
}

/// Listing detail page: one listing, plus its owner's contacts for visitors.
pub struct ListingDetailController {
    config: ControllerConfig,
    listing_id: ListingId,
    viewer: Option<UserId>,
    state: ViewState<Listing>,
    generation: u64,
    contacts: ContactsState,
    contacts_open: bool,
    gate: ConfirmationGate,
    notice: Option<Notice>,
    navigation: Option<NavigationIntent>,
    torn_down: bool,
}

impl ListingDetailController {
    pub fn new(listing_id: ListingId, viewer: Option<UserId>, config: ControllerConfig) -> Self {
        Self {
            config,
            listing_id,
            viewer,
            state: ViewState::Loading,
            generation: 0,
            contacts: ContactsState::NotFetched,
            contacts_open: false,
            gate: ConfirmationGate::new(),
            notice: None,
            navigation: None,
            torn_down: false,
        }
    }

    pub fn listing_id(&self) -> ListingId {
        self.listing_id
    }

    pub fn state(&self) -> &ViewState<Listing> {
        &self.state
    }

    pub fn listing(&self) -> Option<&Listing> {
        self.state.data()
    }

    pub fn viewer(&self) -> Option<UserId> {
        self.viewer
    }

    /// Recomputed from the current viewer and listing on every call
    pub fn is_owner(&self) -> bool {
        OwnershipPolicy::is_owner(self.viewer, self.listing())
    }

    pub fn capabilities(&self) -> ListingCapabilities {
        OwnershipPolicy::capabilities(self.viewer, self.listing())
    }

    pub fn view(&self) -> Option<ListingView> {
        self.listing().map(|l| l.view(self.is_owner()))
    }

    pub fn contacts(&self) -> &ContactsState {
        &self.contacts
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired())
    }

    /// Pending navigation, consumed by the presentation layer
    pub fn take_navigation(&mut self) -> Option<NavigationIntent> {
        self.navigation.take()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // =========================================================================
    // Loading
    // =========================================================================

    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.torn_down {
            return None;
        }
        self.generation += 1;
        self.state = ViewState::Loading;
        self.contacts = ContactsState::NotFetched;
        self.contacts_open = false;

        Some(LoadTicket {
            generation: self.generation,
            listing_id: self.listing_id,
        })
    }

    /// Apply the listing lookup. For a visitor this starts the contact fetch
    /// right away; showing the contacts still waits for `reveal_contacts`.
    pub fn apply_listing(
        &mut self,
        ticket: LoadTicket,
        result: Result<Listing, StoreError>,
    ) -> Option<FetchTicket> {
        if self.torn_down || ticket.generation != self.generation {
            debug!(listing_id = %self.listing_id, "discarding stale listing load");
            return None;
        }

        match result {
            Ok(listing) => {
                debug!(listing_id = %listing.id, "listing loaded");
                self.state = ViewState::Ready(listing);
                self.begin_contacts()
            }
            Err(StoreError::NotFound(reason)) => {
                warn!(listing_id = %self.listing_id, %reason, "listing not found");
                self.state = ViewState::Error(NOT_FOUND_MESSAGE.to_string());
                None
            }
            Err(e) => {
                error!(listing_id = %self.listing_id, error = %e, "failed to load listing");
                self.state = ViewState::Error(LOAD_FAILURE_MESSAGE.to_string());
                None
            }
        }
    }

    /// Viewer changed. Ownership is re-evaluated; a new visitor gets the
    /// contact fetch if it has not happened yet.
    pub fn set_viewer(&mut self, viewer: Option<UserId>) -> Option<FetchTicket> {
        if self.torn_down {
            return None;
        }
        self.viewer = viewer;
        self.gate.cancel();

        if self.is_owner() {
            self.contacts_open = false;
            return None;
        }
        match self.contacts {
            ContactsState::NotFetched | ContactsState::Failed(_) => self.begin_contacts(),
            _ => None,
        }
    }

    fn begin_contacts(&mut self) -> Option<FetchTicket> {
        if self.is_owner() {
            return None;
        }
        let owner_id = self.listing()?.owner_id;
        self.contacts = ContactsState::Loading;
        debug!(%owner_id, "fetching owner contacts");

        Some(FetchTicket {
            generation: self.generation,
            owner_id,
        })
    }

    pub fn apply_contacts(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Contact>, StoreError>,
    ) -> bool {
        let current_owner = self.listing().map(|l| l.owner_id);
        if self.torn_down
            || ticket.generation != self.generation
            || current_owner != Some(ticket.owner_id)
        {
            debug!(owner_id = %ticket.owner_id, "discarding stale contact fetch");
            return false;
        }

        self.contacts = match result {
            Ok(contacts) if contacts.is_empty() => ContactsState::NoContactInfo,
            Ok(contacts) => ContactsState::Available(contacts),
            Err(e) => {
                error!(owner_id = %ticket.owner_id, error = %e, "failed to fetch contacts");
                ContactsState::Failed(CONTACTS_FAILURE_MESSAGE.to_string())
            }
        };
        true
    }

    // =========================================================================
    // Visitor actions
    // =========================================================================

    /// Open the contact options. Owners have nothing to reveal.
    pub fn reveal_contacts(&mut self) -> bool {
        if self.torn_down || self.listing().is_none() || !self.capabilities().can_reveal_contacts()
        {
            return false;
        }
        self.contacts_open = true;
        true
    }

    pub fn close_contacts(&mut self) {
        self.contacts_open = false;
    }

    pub fn contacts_open(&self) -> bool {
        self.contacts_open
    }

    /// Contact options while the dialog is open. An empty vector means the
    /// dialog shows [`NO_CONTACT_INFO_MESSAGE`].
    pub fn contact_options(&self) -> Option<Vec<ContactOption>> {
        if !self.contacts_open {
            return None;
        }
        match &self.contacts {
            ContactsState::Available(contacts) => {
                Some(contacts.iter().map(Contact::option).collect())
            }
            ContactsState::NoContactInfo => Some(Vec::new()),
            _ => None,
        }
    }

    // =========================================================================
    // Owner actions
    // =========================================================================

    pub fn edit(&mut self) -> Option<NavigationIntent> {
        if !self.is_owner() {
            return None;
        }
        let intent = NavigationIntent::NavigateTo(format!(
            "{}?listingId={}",
            self.config.edit_listing_path, self.listing_id
        ));
        self.navigation = Some(intent.clone());
        Some(intent)
    }

    pub fn request_delete(&mut self) -> bool {
        if self.torn_down || !self.is_owner() {
            return false;
        }
        if self.gate.is_resolved() {
            self.gate = ConfirmationGate::new();
        }
        self.gate.request_delete(self.listing_id);
        true
    }

    pub fn cancel_delete(&mut self) {
        self.gate.cancel();
    }

    pub fn confirmation_prompt(&self) -> Option<String> {
        self.gate.pending_target()?;
        Some(confirmation_message(&self.listing()?.name))
    }

    pub fn confirm_delete(&mut self) -> Option<DeleteTicket> {
        if self.torn_down {
            return None;
        }
        // Ownership may have changed while the dialog was open
        let actor = match self.viewer {
            Some(viewer) if self.is_owner() => viewer,
            _ => {
                self.gate.cancel();
                return None;
            }
        };
        let ListingCommand::RemoveListing { listing_id } = self.gate.confirm()?;
        info!(%listing_id, %actor, "delete confirmed from detail view");

        Some(DeleteTicket {
            generation: self.generation,
            actor,
            listing_id,
        })
    }

    /// Apply the store's answer. Success navigates away, since the listing
    /// on screen no longer exists; failure leaves the page as it is.
    pub fn apply_delete(
        &mut self,
        ticket: DeleteTicket,
        result: Result<(), StoreError>,
    ) -> Option<NavigationIntent> {
        if self.torn_down || ticket.generation != self.generation {
            debug!(listing_id = %ticket.listing_id, "discarding stale delete result");
            return None;
        }

        match result {
            Ok(()) => {
                info!(listing_id = %ticket.listing_id, "listing deleted, leaving detail view");
                self.notice = Some(Notice::success(
                    DELETE_SUCCESS_MESSAGE,
                    self.config.notice_ttl,
                ));
                let intent = NavigationIntent::NavigateTo(self.config.home_path.clone());
                self.navigation = Some(intent.clone());
                Some(intent)
            }
            Err(e) => {
                error!(listing_id = %ticket.listing_id, error = %e, "failed to delete listing");
                self.notice = Some(Notice::failure(
                    delete_failure_message(&e),
                    self.config.notice_ttl,
                ));
                None
            }
        }
    }

    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.gate.cancel();
        self.contacts_open = false;
    }

    // =========================================================================
    // Exclusive-ownership helpers
    // =========================================================================

    /// Load the listing and, for visitors, the owner's contacts
    pub async fn load_with(
        &mut self,
        listings: &dyn BaseListingRepository,
        contacts: &dyn BaseContactRepository,
    ) {
        let Some(ticket) = self.begin_load() else {
            return;
        };
        let result = listings.get_by_id(ticket.listing_id).await;
        if let Some(contacts_ticket) = self.apply_listing(ticket, result) {
            let result = contacts.list_by_owner(contacts_ticket.owner_id).await;
            self.apply_contacts(contacts_ticket, result);
        }
    }

    pub async fn confirm_delete_with(
        &mut self,
        listings: &dyn BaseListingRepository,
    ) -> Option<NavigationIntent> {
        let ticket = self.confirm_delete()?;
        let result = listings.remove(ticket.actor, ticket.listing_id).await;
        self.apply_delete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::NoticeKind;
    use crate::domains::listings::models::CreateListing;
    use crate::kernel::test_dependencies::{MockContactRepository, MockListingRepository};
    use chrono::Utc;

    struct Fixture {
        listings: MockListingRepository,
        contacts: MockContactRepository,
        owner: UserId,
        listing: Listing,
    }

    fn fixture() -> Fixture {
        let owner = UserId::new();
        let listings = MockListingRepository::new();
        let mut input = CreateListing::new(owner, "Road bike");
        input.currency = "USD".to_string();
        let listing = listings.insert(input, Utc::now());
        let contacts = MockContactRepository::new()
            .with_contact(owner, "whatsapp", "905551112233")
            .with_contact(owner, "whatsapp", "905559998877")
            .with_contact(owner, "email", "seller@example.com");
        Fixture {
            listings,
            contacts,
            owner,
            listing,
        }
    }

    async fn loaded(f: &Fixture, viewer: Option<UserId>) -> ListingDetailController {
        let mut controller =
            ListingDetailController::new(f.listing.id, viewer, ControllerConfig::default());
        controller.load_with(&f.listings, &f.contacts).await;
        controller
    }

    #[tokio::test]
    async fn test_visitor_fetches_contacts_eagerly_but_reveals_on_demand() {
        let f = fixture();
        let mut controller = loaded(&f, Some(UserId::new())).await;

        assert!(!controller.is_owner());
        assert_eq!(f.contacts.calls(), vec![f.owner]);
        match controller.contacts() {
            ContactsState::Available(contacts) => assert_eq!(contacts.len(), 3),
            other => panic!("expected contacts, got {:?}", other),
        }
        assert!(controller.contact_options().is_none());

        assert!(controller.reveal_contacts());
        let options = controller.contact_options().unwrap();
        assert_eq!(options.len(), 3);
        assert!(options.iter().any(|o| o.link.as_deref() == Some("mailto:seller@example.com")));

        controller.close_contacts();
        assert!(controller.contact_options().is_none());
    }

    #[tokio::test]
    async fn test_unauthenticated_viewer_is_a_visitor() {
        let f = fixture();
        let controller = loaded(&f, None).await;
        assert!(controller.capabilities().can_reveal_contacts());
        assert_eq!(f.contacts.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_owner_skips_contacts_and_can_manage() {
        let f = fixture();
        let mut controller = loaded(&f, Some(f.owner)).await;

        assert!(controller.is_owner());
        assert!(controller.capabilities().can_manage());
        assert!(controller.view().unwrap().own_listing);
        assert!(f.contacts.calls().is_empty());
        assert!(!controller.reveal_contacts());
        assert_eq!(controller.contacts(), &ContactsState::NotFetched);
    }

    #[tokio::test]
    async fn test_owner_without_contacts_is_no_contact_info() {
        let f = fixture();
        let contacts = MockContactRepository::new();
        let mut controller =
            ListingDetailController::new(f.listing.id, Some(UserId::new()), ControllerConfig::default());
        controller.load_with(&f.listings, &contacts).await;

        assert_eq!(controller.contacts(), &ContactsState::NoContactInfo);
        assert!(controller.state().data().is_some());
        controller.reveal_contacts();
        assert_eq!(controller.contact_options(), Some(vec![]));
    }

    #[tokio::test]
    async fn test_contact_failure_does_not_replace_view() {
        let f = fixture();
        f.contacts.fail_with(StoreError::Fetch("unreachable".into()));
        let controller = loaded(&f, Some(UserId::new())).await;

        assert!(controller.state().data().is_some());
        assert_eq!(
            controller.contacts(),
            &ContactsState::Failed(CONTACTS_FAILURE_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_listing_is_not_found_error() {
        let f = fixture();
        let mut controller =
            ListingDetailController::new(ListingId::new(), Some(f.owner), ControllerConfig::default());
        controller.load_with(&f.listings, &f.contacts).await;

        assert_eq!(controller.state().error(), Some(NOT_FOUND_MESSAGE));
        assert!(!controller.is_owner());
    }

    #[tokio::test]
    async fn test_transient_load_failure_is_distinct_from_not_found() {
        let f = fixture();
        f.listings.fail_lists_with(StoreError::Fetch("timeout".into()));
        let controller = loaded(&f, Some(f.owner)).await;

        assert_eq!(controller.state().error(), Some(LOAD_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_currency_symbol_in_view() {
        let f = fixture();
        let controller = loaded(&f, None).await;
        assert_eq!(controller.view().unwrap().price_label, "N/A $");
    }

    #[tokio::test]
    async fn test_edit_navigates_with_id() {
        let f = fixture();
        let mut controller = loaded(&f, Some(f.owner)).await;

        let intent = controller.edit().unwrap();
        assert_eq!(
            intent.path(),
            format!("/edit-listing?listingId={}", f.listing.id)
        );
        assert_eq!(controller.take_navigation(), Some(intent));
        assert!(f.listings.remove_calls().is_empty());
    }

    #[tokio::test]
    async fn test_visitor_cannot_edit_or_delete() {
        let f = fixture();
        let mut controller = loaded(&f, Some(UserId::new())).await;

        assert!(controller.edit().is_none());
        assert!(!controller.request_delete());
        assert!(controller.confirm_delete_with(&f.listings).await.is_none());
        assert!(f.listings.remove_calls().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_delete_navigates_home() {
        let f = fixture();
        let mut controller = loaded(&f, Some(f.owner)).await;

        assert!(controller.request_delete());
        assert_eq!(
            controller.confirmation_prompt().unwrap(),
            confirmation_message("Road bike")
        );
        let intent = controller.confirm_delete_with(&f.listings).await;

        assert_eq!(intent, Some(NavigationIntent::NavigateTo("/".to_string())));
        assert_eq!(f.listings.remove_calls().len(), 1);
        assert_eq!(controller.notice().unwrap().kind, NoticeKind::Success);
    }

    #[tokio::test]
    async fn test_failed_delete_stays_on_page() {
        let f = fixture();
        f.listings.fail_removes_with(StoreError::NotFound("gone".into()));
        let mut controller = loaded(&f, Some(f.owner)).await;

        controller.request_delete();
        let intent = controller.confirm_delete_with(&f.listings).await;

        assert!(intent.is_none());
        assert!(controller.take_navigation().is_none());
        assert_eq!(controller.listing().map(|l| l.id), Some(f.listing.id));
        assert_eq!(controller.notice().unwrap().kind, NoticeKind::Failure);
    }

    #[tokio::test]
    async fn test_viewer_change_reevaluates_ownership() {
        let f = fixture();
        let mut controller = loaded(&f, Some(f.owner)).await;
        controller.request_delete();

        // Owner signs out while the dialog is open
        let ticket = controller.set_viewer(None).unwrap();
        assert!(!controller.is_owner());
        assert!(controller.confirm_delete().is_none());
        assert_eq!(ticket.owner_id, f.owner);

        let result = f.contacts.list_by_owner(ticket.owner_id).await;
        assert!(controller.apply_contacts(ticket, result));
        assert!(controller.reveal_contacts());
    }

    #[tokio::test]
    async fn test_teardown_ignores_late_results() {
        let f = fixture();
        let mut controller =
            ListingDetailController::new(f.listing.id, Some(UserId::new()), ControllerConfig::default());
        let ticket = controller.begin_load().unwrap();
        assert_eq!(ticket.listing_id, f.listing.id);
        controller.teardown();

        let result = f.listings.get_by_id(f.listing.id).await;
        assert!(controller.apply_listing(ticket, result).is_none());
        assert!(controller.state().is_loading());
    }
}
