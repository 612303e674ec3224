// Listings - owner-scoped listing management and contact resolution
//
// Controllers hold the view-models a storefront renders ("my listings", the
// listing detail page). Stores and the identity provider sit behind the
// traits in `kernel`, so controllers run the same against Postgres and the
// in-memory doubles used in tests.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
