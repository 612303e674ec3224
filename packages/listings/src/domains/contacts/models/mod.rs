pub mod contact;

pub use contact::{Contact, ContactOption, ContactType};
