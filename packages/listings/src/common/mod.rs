// Common types and utilities shared across the listing domains

pub mod auth;
pub mod entity_ids;
pub mod id;
pub mod machine;
pub mod types;

pub use auth::{ListingCapabilities, OwnershipPolicy};
pub use entity_ids::*;
pub use id::Id;
pub use machine::Machine;
pub use types::*;
