//! Service layer - album fetches and provider calls
//!
//! The Service actor receives commands, runs each on its own task and
//! sends back responses.

pub mod actor;
pub mod client;

pub use actor::ServiceActor;
