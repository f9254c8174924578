//! Provider seams - authentication, document store and location
//!
//! Each external service sits behind a narrow trait so the service actor can
//! be driven by fakes in tests. The default implementations talk to the
//! Firebase REST APIs and to an IP geolocation endpoint.

pub mod firebase;
pub mod location;

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::config::{Config, LocationSourceKind};
use crate::models::{Coordinates, Credentials, Record, Session};

pub use firebase::{FirebaseAuth, FirestoreStore};
pub use location::{FixedLocation, IpLocation};

/// Failure reported by a provider; the display text is shown to the user as is
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The service answered and refused the call
    #[error("{0}")]
    Rejected(String),
    /// The service could not be reached
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    /// The call was never sent because local state does not allow it
    #[error("{0}")]
    Unavailable(String),
}

// Request URLs carry the API key as a query parameter
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.without_url())
    }
}

/// Email/password authentication
pub trait AuthProvider: Send + Sync {
    fn sign_in<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Session, ProviderError>>;

    fn sign_up<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Session, ProviderError>>;
}

/// Write-only document store
pub trait RecordStore: Send + Sync {
    /// Add `record` to `collection`, returning the new document id
    fn add<'a>(
        &'a self,
        session: &'a Session,
        collection: &'a str,
        record: &'a Record,
    ) -> BoxFuture<'a, Result<String, ProviderError>>;
}

/// One-shot read of the last known coordinate
pub trait LocationSource: Send + Sync {
    /// `Ok(None)` when no fix is known
    fn last_known(&self) -> BoxFuture<'_, Result<Option<Coordinates>, ProviderError>>;
}

/// The provider set handed to the service actor
#[derive(Clone)]
pub struct Providers {
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn RecordStore>,
    pub location: Arc<dyn LocationSource>,
}

impl Providers {
    /// Build the default providers described by `config`
    pub fn from_config(config: &Config, client: reqwest::Client) -> anyhow::Result<Self> {
        let auth = FirebaseAuth::new(
            client.clone(),
            config.firebase_auth_base()?,
            config.firebase.api_key.clone(),
        );
        let store = FirestoreStore::new(
            client.clone(),
            config.firestore_base()?,
            config.firebase.project_id.clone(),
            config.firebase.api_key.clone(),
        );
        let location: Arc<dyn LocationSource> = match config.location.source {
            LocationSourceKind::Fixed => Arc::new(FixedLocation::from_config(&config.location)),
            LocationSourceKind::Ip => Arc::new(IpLocation::new(
                client,
                reqwest::Url::parse(&config.location.lookup_url)?,
            )),
        };

        Ok(Providers {
            auth: Arc::new(auth),
            store: Arc::new(store),
            location,
        })
    }
}
