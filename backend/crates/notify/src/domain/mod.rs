//! Domain Layer

pub mod check;
pub mod event;
pub mod subscriber_key;
