//! Infrastructure Layer
//!
//! Principal directory implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPrincipalDirectory;
pub use postgres::PgPrincipalDirectory;
