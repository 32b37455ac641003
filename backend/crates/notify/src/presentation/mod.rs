//! Presentation Layer
//!
//! SSE subscribe endpoint.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::NotifyAppState;
pub use router::notify_router;
