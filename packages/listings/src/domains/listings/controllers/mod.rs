//! View controllers for "my listings" and the listing detail page.
//!
//! Controllers are synchronous state holders. Every store call is split in
//! two: a `begin`/`confirm` step hands out a ticket, the caller performs the
//! async repository call, and an `apply` step feeds the result back. Tickets
//! carry the generation they were issued under, so a result that arrives after
//! the identity or listing changed (or after teardown) is dropped instead of
//! applied. The `*_with` helpers do all three steps for callers that own the
//! controller exclusively.

mod detail;
mod list;
mod session;

pub use detail::{ContactsState, ListingDetailController, NO_CONTACT_INFO_MESSAGE};
pub use list::{apply_delete_success, ListingListController, EMPTY_LIST_MESSAGE};
pub use session::ListingListSession;

use crate::common::{ListingId, UserId};
use crate::kernel::StoreError;

pub const DELETE_SUCCESS_MESSAGE: &str = "Listing successfully deleted";
pub const DELETE_FAILURE_MESSAGE: &str = "Failed to delete listing";

/// An owner-scoped query (listings or contacts) tagged with its generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub owner_id: UserId,
}

/// A detail-page lookup of one listing by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub listing_id: ListingId,
}

/// A confirmed delete waiting on the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteTicket {
    generation: u64,
    pub actor: UserId,
    pub listing_id: ListingId,
}

/// Plain-language notice text for a failed delete
fn delete_failure_message(err: &StoreError) -> String {
    match err {
        StoreError::Fetch(_) => DELETE_FAILURE_MESSAGE.to_string(),
        StoreError::NotFound(_) => {
            format!("{}: it no longer exists", DELETE_FAILURE_MESSAGE)
        }
        StoreError::PermissionDenied(_) => {
            format!("{}: you do not have permission", DELETE_FAILURE_MESSAGE)
        }
    }
}
