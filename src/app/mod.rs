//! App layer - central state management and command processing
//!
//! The App actor receives UI events and service responses,
//! updates state, and emits service commands and render state.

pub mod state;
pub mod actor;
pub mod commands;
pub mod form;

pub use state::AppState;
pub use actor::AppActor;
pub use form::Form;
