pub mod models;
pub mod repository;

// Re-export commonly used types
pub use models::{Contact, ContactOption, ContactType};
pub use repository::PgContactRepository;
