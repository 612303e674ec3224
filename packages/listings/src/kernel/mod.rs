// Infrastructure: store errors, repository and identity traits, and the
// in-memory doubles used by tests.

pub mod errors;
pub mod identity;
pub mod test_dependencies;
pub mod traits;

pub use errors::StoreError;
pub use identity::LocalIdentityProvider;
pub use traits::*;
