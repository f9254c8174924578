//! # Songbook
//!
//! A small terminal client around a few remote services.
//!
//! ## Features
//! - Email/password sign in and sign up (Firebase Identity Toolkit)
//! - Add songs to a `songs` collection (Firestore)
//! - Album list fetched from a public REST endpoint
//! - Last known location behind a permission prompt
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Service Layer (Tokio runtime)

pub mod models;
pub mod config;
pub mod constants;
pub mod fetch_state;
pub mod providers;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{Album, Coordinates, Credentials, Record, Session, Song};
pub use config::Config;
pub use fetch_state::{fetch_albums, AlbumFetchState, FetchError, FetchState};
pub use providers::{AuthProvider, LocationSource, ProviderError, Providers, RecordStore};
pub use messages::{ServiceCommand, ServiceResponse, RenderState, UiEvent};
pub use app::{AppState, AppActor};
pub use network::ServiceActor;
