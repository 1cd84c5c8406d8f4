//! Shared types for the Robusta POS
//!
//! Common types used by the server crate (and future client crates):
//! domain models, the order workflow types, and the message bus envelope.

pub mod message;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{BusMessage, EventType, Topic};
