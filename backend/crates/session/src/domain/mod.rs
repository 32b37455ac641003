//! Domain Layer
//!
//! Contains entities, value objects, and the principal directory trait.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{principal::Principal, token::TokenPair};
pub use repository::PrincipalDirectory;
