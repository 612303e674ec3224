use tracing::debug;

use crate::common::{ListingId, Machine};
use crate::domains::listings::commands::ListingCommand;
use crate::domains::listings::events::ConfirmationEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    PendingConfirmation(ListingId),
    /// Terminal; a new delete intent needs a fresh gate
    Resolved,
}

/// Confirmation gate for destructive actions.
///
/// `RemoveListing` is decided only on `DeleteConfirmed` while pending, and
/// only once: the gate is resolved afterwards. A second `DeleteRequested`
/// while pending retargets the gate rather than queueing.
#[derive(Debug, Clone)]
pub struct ConfirmationGate {
    state: GateState,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn pending_target(&self) -> Option<ListingId> {
        match self.state {
            GateState::PendingConfirmation(listing_id) => Some(listing_id),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.state == GateState::Resolved
    }

    pub fn request_delete(&mut self, listing_id: ListingId) {
        self.decide(&ConfirmationEvent::DeleteRequested { listing_id });
    }

    pub fn confirm(&mut self) -> Option<ListingCommand> {
        self.decide(&ConfirmationEvent::DeleteConfirmed)
    }

    pub fn cancel(&mut self) {
        self.decide(&ConfirmationEvent::DeleteCancelled);
    }
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for ConfirmationGate {
    type Event = ConfirmationEvent;
    type Command = ListingCommand;

    fn decide(&mut self, event: &ConfirmationEvent) -> Option<ListingCommand> {
        match (self.state, event) {
            (GateState::Resolved, _) => {
                debug!(event = ?event, "confirmation gate already resolved, ignoring");
                None
            }

            (_, ConfirmationEvent::DeleteRequested { listing_id }) => {
                self.state = GateState::PendingConfirmation(*listing_id);
                None
            }

            (GateState::PendingConfirmation(listing_id), ConfirmationEvent::DeleteConfirmed) => {
                self.state = GateState::Resolved;
                Some(ListingCommand::RemoveListing { listing_id })
            }

            (GateState::PendingConfirmation(_), ConfirmationEvent::DeleteCancelled) => {
                self.state = GateState::Idle;
                None
            }

            // Confirm/cancel with nothing pending
            (GateState::Idle, _) => None,
        }
    }
}

/// Text of the confirmation dialog
pub fn confirmation_message(listing_name: &str) -> String {
    format!(
        "Are you sure you want to delete the listing \"{}\"? This action cannot be undone.",
        listing_name
    )
}
