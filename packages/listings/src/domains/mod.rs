pub mod contacts;
pub mod listings;
