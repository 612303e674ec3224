//! Ownership checks for listings.
//!
//! The policy decides which action set a view-model exposes:
//!
//! ```rust
//! use listings_core::common::{ListingCapabilities, OwnershipPolicy, UserId};
//! use listings_core::domains::listings::Listing;
//!
//! let viewer = UserId::new();
//! let caps = OwnershipPolicy::capabilities::<Listing>(Some(viewer), None);
//! assert_eq!(caps, ListingCapabilities::Contact { reveal_contacts: true });
//! ```
//!
//! The policy is advisory UI gating. The store stays the security boundary:
//! a `PermissionDenied` from the repository wins even when the policy said
//! the viewer owns the listing.

mod capability;
mod policy;

pub use capability::ListingCapabilities;
pub use policy::{HasOwner, OwnershipPolicy};
