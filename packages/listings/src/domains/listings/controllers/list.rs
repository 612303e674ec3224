use tracing::{debug, error, info, warn};

use super::{delete_failure_message, DeleteTicket, FetchTicket, DELETE_SUCCESS_MESSAGE};
use crate::common::{ListingId, Notice, UserId, ViewState};
use crate::config::ControllerConfig;
use crate::domains::listings::commands::ListingCommand;
use crate::domains::listings::machines::{confirmation_message, ConfirmationGate};
use crate::domains::listings::models::Listing;
use crate::kernel::{BaseListingRepository, StoreError};

pub const EMPTY_LIST_MESSAGE: &str = "No listings available. Create your first listing!";
const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch listings";

/// Drop a deleted listing from a loaded list, keeping the others in order.
///
/// Only called after the store confirmed the delete. Non-ready states pass
/// through untouched.
pub fn apply_delete_success(
    state: ViewState<Vec<Listing>>,
    listing_id: ListingId,
) -> ViewState<Vec<Listing>> {
    match state {
        ViewState::Ready(mut listings) => {
            listings.retain(|l| l.id != listing_id);
            ViewState::Ready(listings)
        }
        other => other,
    }
}

/// "My listings": the signed-in user's listings, newest first.
pub struct ListingListController {
    config: ControllerConfig,
    state: ViewState<Vec<Listing>>,
    viewer: Option<UserId>,
    generation: u64,
    gate: ConfirmationGate,
    notice: Option<Notice>,
    torn_down: bool,
}

impl ListingListController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: ViewState::Loading,
            viewer: None,
            generation: 0,
            gate: ConfirmationGate::new(),
            notice: None,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<Listing>> {
        &self.state
    }

    pub fn listings(&self) -> Option<&[Listing]> {
        self.state.data().map(Vec::as_slice)
    }

    pub fn viewer(&self) -> Option<UserId> {
        self.viewer
    }

    /// "Create your first listing" affordance for a loaded, empty list
    pub fn empty_message(&self) -> Option<&'static str> {
        match &self.state {
            ViewState::Ready(listings) if listings.is_empty() => Some(EMPTY_LIST_MESSAGE),
            _ => None,
        }
    }

    /// The current notice, if it has not expired yet
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired())
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // =========================================================================
    // Identity and fetching
    // =========================================================================

    /// React to an identity change.
    ///
    /// A known user starts a new fetch generation and returns its ticket;
    /// signing out tears the controller down.
    pub fn set_identity(&mut self, user: Option<UserId>) -> Option<FetchTicket> {
        if self.torn_down {
            return None;
        }

        let Some(owner_id) = user else {
            info!("identity lost, tearing down listing list");
            self.teardown();
            return None;
        };

        self.generation += 1;
        self.viewer = Some(owner_id);
        self.state = ViewState::Loading;
        self.gate = ConfirmationGate::new();
        debug!(%owner_id, generation = self.generation, "fetching listings");

        Some(FetchTicket {
            generation: self.generation,
            owner_id,
        })
    }

    /// Apply a fetch result. Returns `false` when the result was stale.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Listing>, StoreError>,
    ) -> bool {
        if self.torn_down || ticket.generation != self.generation {
            debug!(
                owner_id = %ticket.owner_id,
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                torn_down = self.torn_down,
                "discarding stale listing fetch"
            );
            return false;
        }

        self.state = match result {
            Ok(listings) => {
                debug!(owner_id = %ticket.owner_id, count = listings.len(), "listings loaded");
                ViewState::Ready(listings)
            }
            Err(e) => {
                error!(owner_id = %ticket.owner_id, error = %e, "failed to fetch listings");
                ViewState::Error(FETCH_FAILURE_MESSAGE.to_string())
            }
        };
        true
    }

    // =========================================================================
    // Delete workflow
    // =========================================================================

    /// Open the confirmation for a listing in the loaded list.
    /// Returns `false` when there is no such listing.
    pub fn request_delete(&mut self, listing_id: ListingId) -> bool {
        if self.torn_down {
            return false;
        }
        let known = self
            .listings()
            .is_some_and(|listings| listings.iter().any(|l| l.id == listing_id));
        if !known {
            warn!(%listing_id, "delete requested for a listing not in the list");
            return false;
        }

        if self.gate.is_resolved() {
            self.gate = ConfirmationGate::new();
        }
        self.gate.request_delete(listing_id);
        true
    }

    pub fn cancel_delete(&mut self) {
        self.gate.cancel();
    }

    pub fn pending_delete(&self) -> Option<ListingId> {
        self.gate.pending_target()
    }

    /// Dialog text for the pending delete
    pub fn confirmation_prompt(&self) -> Option<String> {
        let target = self.gate.pending_target()?;
        let listing = self.listings()?.iter().find(|l| l.id == target)?;
        Some(confirmation_message(&listing.name))
    }

    /// Confirm the pending delete. The ticket is the only way to reach the
    /// store, and at most one is handed out per request.
    pub fn confirm_delete(&mut self) -> Option<DeleteTicket> {
        if self.torn_down {
            return None;
        }
        let actor = self.viewer?;
        let ListingCommand::RemoveListing { listing_id } = self.gate.confirm()?;
        info!(%listing_id, %actor, "delete confirmed");

        Some(DeleteTicket {
            generation: self.generation,
            actor,
            listing_id,
        })
    }

    /// Apply the store's answer to a delete.
    ///
    /// Success removes the listing locally without re-fetching. Failure keeps
    /// the list exactly as it was and only raises a notice.
    pub fn apply_delete(&mut self, ticket: DeleteTicket, result: Result<(), StoreError>) -> bool {
        if self.torn_down || ticket.generation != self.generation {
            debug!(listing_id = %ticket.listing_id, "discarding delete result for a stale list");
            return false;
        }

        match result {
            Ok(()) => {
                let state = std::mem::replace(&mut self.state, ViewState::Loading);
                self.state = apply_delete_success(state, ticket.listing_id);
                self.notice = Some(Notice::success(
                    DELETE_SUCCESS_MESSAGE,
                    self.config.notice_ttl,
                ));
                info!(listing_id = %ticket.listing_id, "listing deleted");
            }
            Err(e) => {
                error!(listing_id = %ticket.listing_id, error = %e, "failed to delete listing");
                self.notice = Some(Notice::failure(
                    delete_failure_message(&e),
                    self.config.notice_ttl,
                ));
            }
        }
        true
    }

    /// Stop applying results. Irreversible for this instance.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.gate.cancel();
    }

    // =========================================================================
    // Exclusive-ownership helpers
    // =========================================================================

    /// Set the identity and load its listings in one go
    pub async fn load_with(
        &mut self,
        user: Option<UserId>,
        repo: &dyn BaseListingRepository,
    ) -> bool {
        let Some(ticket) = self.set_identity(user) else {
            return false;
        };
        let result = repo.list_by_owner(ticket.owner_id).await;
        self.apply_fetch(ticket, result)
    }

    /// Confirm the pending delete and run it against `repo`.
    /// Returns `false` when nothing was pending.
    pub async fn confirm_delete_with(&mut self, repo: &dyn BaseListingRepository) -> bool {
        let Some(ticket) = self.confirm_delete() else {
            return false;
        };
        let result = repo.remove(ticket.actor, ticket.listing_id).await;
        self.apply_delete(ticket, result)
    }
}
