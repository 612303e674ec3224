use crate::common::ListingId;

/// Delete-confirmation events - what the user did in the confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationEvent {
    /// User clicked delete on a listing; the dialog opens
    DeleteRequested { listing_id: ListingId },

    /// User confirmed in the dialog
    DeleteConfirmed,

    /// User dismissed the dialog
    DeleteCancelled,
}
