use super::ListingCapabilities;
use crate::common::entity_ids::UserId;

/// Anything with an immutable owner.
pub trait HasOwner {
    fn owner_id(&self) -> UserId;
}

/// Pure ownership decisions. No IO, no caching: callers re-evaluate on every
/// viewer or listing change.
pub struct OwnershipPolicy;

impl OwnershipPolicy {
    /// `false` when either side is missing (unauthenticated viewer, listing
    /// not loaded yet); otherwise compares ids.
    pub fn is_owner<L: HasOwner>(viewer: Option<UserId>, listing: Option<&L>) -> bool {
        match (viewer, listing) {
            (Some(viewer), Some(listing)) => viewer == listing.owner_id(),
            _ => false,
        }
    }

    pub fn capabilities<L: HasOwner>(
        viewer: Option<UserId>,
        listing: Option<&L>,
    ) -> ListingCapabilities {
        if Self::is_owner(viewer, listing) {
            ListingCapabilities::Manage {
                edit: true,
                delete: true,
            }
        } else {
            ListingCapabilities::Contact {
                reveal_contacts: true,
            }
        }
    }
}
