//! Core types and service wiring for the thermolog temperature reading recorder.

/// Pure aggregation over in-memory reading sets.
pub mod aggregate;
/// Domain models and identifiers shared by all store backends.
pub mod model;
/// Traits describing the store interfaces.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;
/// Bundle of store ports a service is wired to.
pub mod store;

pub use model::*;
pub use ports::*;
pub use service::*;
pub use store::*;
