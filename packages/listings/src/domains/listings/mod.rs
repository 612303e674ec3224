pub mod commands;
pub mod controllers;
pub mod events;
pub mod machines;
pub mod models;
pub mod repository;

// Re-export commonly used types
pub use controllers::{
    apply_delete_success, ContactsState, ListingDetailController, ListingListController,
    ListingListSession, EMPTY_LIST_MESSAGE, NO_CONTACT_INFO_MESSAGE,
};
pub use machines::{confirmation_message, ConfirmationGate, GateState};
pub use models::{resolve_symbol, CreateListing, Currency, Listing, ListingView};
pub use repository::PgListingRepository;
