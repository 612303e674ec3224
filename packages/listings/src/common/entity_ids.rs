//! Typed ID definitions for the listing domain.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for authenticated users (listing owners and viewers).
pub struct User;

/// Marker type for Listing entities.
pub struct Listing;

/// Marker type for Contact entities.
pub struct Contact;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for users, as issued by the identity provider.
pub type UserId = Id<User>;

/// Typed ID for Listing entities.
pub type ListingId = Id<Listing>;

/// Typed ID for Contact entities.
pub type ContactId = Id<Contact>;
