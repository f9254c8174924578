//! Album fetch state machine
//!
//! One activation of the albums screen opens an attempt, performs a single
//! GET against `<base-url>/albums` and settles into exactly one terminal
//! state. Responses that arrive for an attempt that is no longer current, or
//! that has already settled, are dropped.

use std::error::Error as _;

use reqwest::Url;

use crate::models::Album;

/// Presentation state of the albums screen
#[derive(Clone, Debug, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Loading,
    Success {
        albums: Vec<Album>,
    },
    Error {
        message: String,
    },
}

impl FetchState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FetchState::Loading)
    }
}

impl From<Result<Vec<Album>, FetchError>> for FetchState {
    fn from(result: Result<Vec<Album>, FetchError>) -> Self {
        match result {
            Ok(albums) => FetchState::Success { albums },
            Err(e) => FetchState::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Why an album fetch did not produce a list
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("Error {0}")]
    Status(u16),
    /// Connectivity failure: refused, unreachable, DNS, timeout, reset
    #[error("Network error")]
    Transport(#[source] reqwest::Error),
    /// The exchange completed but was not valid HTTP or not a valid payload
    #[error("HTTP error")]
    Protocol { detail: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if is_transport(&err) {
            FetchError::Transport(err)
        } else {
            FetchError::Protocol {
                detail: err.to_string(),
            }
        }
    }
}

/// Connect and timeout errors, plus anything with an I/O error in its chain
fn is_transport(err: &reqwest::Error) -> bool {
    if err.is_connect() || err.is_timeout() {
        return true;
    }
    let mut source = err.source();
    while let Some(inner) = source {
        if inner.is::<std::io::Error>() {
            return true;
        }
        source = inner.source();
    }
    false
}

/// Perform the single GET and decode the album list.
///
/// An empty body or a JSON `null` is an empty list. A body that is not a
/// list of albums is a protocol error.
pub async fn fetch_albums(client: &reqwest::Client, url: &Url) -> Result<Vec<Album>, FetchError> {
    tracing::info!(url = %url, "Fetching albums");

    let resp = client.get(url.clone()).send().await.map_err(|e| {
        tracing::warn!(error = %e, "Album request failed");
        FetchError::from(e)
    })?;
    let status = resp.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "Album request rejected");
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = resp.bytes().await.map_err(|e| {
        tracing::warn!(error = %e, "Album body could not be read");
        FetchError::from(e)
    })?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    match serde_json::from_slice::<Option<Vec<Album>>>(&body) {
        Ok(albums) => {
            let albums = albums.unwrap_or_default();
            tracing::info!(count = albums.len(), "Albums received");
            Ok(albums)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Album payload could not be decoded");
            Err(FetchError::Protocol {
                detail: e.to_string(),
            })
        }
    }
}

/// State cell owned by one albums screen
#[derive(Debug, Default)]
pub struct AlbumFetchState {
    state: FetchState,
    attempt: u64,
    settled: bool,
}

impl AlbumFetchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Id of the current attempt, 0 before the first `begin`
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn is_pending(&self) -> bool {
        self.attempt > 0 && !self.settled
    }

    /// Reset to `Loading` and open a new attempt
    pub fn begin(&mut self) -> u64 {
        self.attempt += 1;
        self.state = FetchState::Loading;
        self.settled = false;
        self.attempt
    }

    /// Settle `attempt` with a terminal state. Returns false, leaving the
    /// state untouched, for stale or already-settled attempts.
    pub fn complete(&mut self, attempt: u64, outcome: FetchState) -> bool {
        if attempt == 0 || attempt != self.attempt || self.settled || !outcome.is_terminal() {
            tracing::debug!(attempt, current = self.attempt, "Dropping album outcome");
            return false;
        }
        self.state = outcome;
        self.settled = true;
        true
    }

    /// Run one full attempt in place
    pub async fn run(&mut self, client: &reqwest::Client, url: &Url) -> &FetchState {
        let attempt = self.begin();
        let outcome = FetchState::from(fetch_albums(client, url).await);
        self.complete(attempt, outcome);
        &self.state
    }
}
