pub mod currency;
pub mod listing;

pub use currency::{resolve_symbol, Currency};
pub use listing::{CreateListing, Listing, ListingView};
