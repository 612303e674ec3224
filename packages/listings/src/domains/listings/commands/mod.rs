use crate::common::ListingId;

/// Listing commands - intent to perform store IO
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingCommand {
    /// Remove a listing from the store
    RemoveListing { listing_id: ListingId },
}
