//! Service messages - communication between App and Service layers

use crate::fetch_state::FetchState;
use crate::models::{Coordinates, Credentials, Record, Session};

/// Commands sent from App layer to Service layer
#[derive(Debug, Clone)]
pub enum ServiceCommand {
    /// Sign in with email/password
    SignIn {
        id: u64,
        credentials: Credentials,
    },
    /// Create an account with email/password
    SignUp {
        id: u64,
        credentials: Credentials,
    },
    /// Add a record to a document store collection
    AddRecord {
        id: u64,
        session: Session,
        collection: String,
        record: Record,
    },
    /// Fetch the album list for one albums-screen attempt
    FetchAlbums {
        attempt: u64,
    },
    /// Read the last known location once
    FetchLocation {
        id: u64,
    },

    /// Shutdown the service actor
    Shutdown,
}

/// Responses sent from Service layer to App layer
#[derive(Debug, Clone)]
pub enum ServiceResponse {
    SignedIn {
        id: u64,
        session: Session,
    },
    SignedUp {
        id: u64,
        email: String,
    },
    /// Sign-in or sign-up failed; message comes from the provider
    AuthFailed {
        id: u64,
        message: String,
    },
    RecordAdded {
        id: u64,
        document_id: String,
    },
    RecordFailed {
        id: u64,
        message: String,
    },
    /// Terminal state for an album attempt
    Albums {
        attempt: u64,
        state: FetchState,
    },
    Location {
        id: u64,
        coordinates: Option<Coordinates>,
    },
    LocationFailed {
        id: u64,
        message: String,
    },
}

impl ServiceResponse {
    /// Get the request (or attempt) id from the response
    pub fn id(&self) -> u64 {
        match self {
            ServiceResponse::SignedIn { id, .. } => *id,
            ServiceResponse::SignedUp { id, .. } => *id,
            ServiceResponse::AuthFailed { id, .. } => *id,
            ServiceResponse::RecordAdded { id, .. } => *id,
            ServiceResponse::RecordFailed { id, .. } => *id,
            ServiceResponse::Albums { attempt, .. } => *attempt,
            ServiceResponse::Location { id, .. } => *id,
            ServiceResponse::LocationFailed { id, .. } => *id,
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            ServiceResponse::AuthFailed { .. }
            | ServiceResponse::RecordFailed { .. }
            | ServiceResponse::LocationFailed { .. } => true,
            ServiceResponse::Albums { state, .. } => matches!(state, FetchState::Error { .. }),
            _ => false,
        }
    }
}
