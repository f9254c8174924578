//! Service actor - runs album fetches and provider calls in the Tokio runtime

use reqwest::Url;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::fetch_state::{fetch_albums, FetchState};
use crate::messages::{ServiceCommand, ServiceResponse};
use crate::providers::Providers;

/// Service actor that processes commands from the App layer
pub struct ServiceActor {
    client: reqwest::Client,
    albums_url: Url,
    providers: Providers,
    response_tx: mpsc::UnboundedSender<ServiceResponse>,
    active_requests: JoinSet<()>,
}

impl ServiceActor {
    pub fn new(
        client: reqwest::Client,
        albums_url: Url,
        providers: Providers,
        response_tx: mpsc::UnboundedSender<ServiceResponse>,
    ) -> Self {
        ServiceActor {
            client,
            albums_url,
            providers,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the service actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<ServiceCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(ServiceCommand::Shutdown) | None => break,
                        Some(cmd) => self.dispatch(cmd),
                    }
                }

                // Clean up completed tasks
                Some(result) = self.active_requests.join_next() => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Service task failed");
                    }
                }
            }
        }

        // In-flight tasks are not cancelled; they finish and their replies
        // go to a closed channel.
        self.active_requests.detach_all();
    }

    /// Spawn one task for `cmd`
    fn dispatch(&mut self, cmd: ServiceCommand) {
        let response_tx = self.response_tx.clone();

        match cmd {
            ServiceCommand::SignIn { id, credentials } => {
                let auth = self.providers.auth.clone();
                self.active_requests.spawn(async move {
                    let response = match auth.sign_in(&credentials).await {
                        Ok(session) => ServiceResponse::SignedIn { id, session },
                        Err(e) => ServiceResponse::AuthFailed {
                            id,
                            message: e.to_string(),
                        },
                    };
                    let _ = response_tx.send(response);
                });
            }

            ServiceCommand::SignUp { id, credentials } => {
                let auth = self.providers.auth.clone();
                self.active_requests.spawn(async move {
                    let response = match auth.sign_up(&credentials).await {
                        Ok(session) => ServiceResponse::SignedUp {
                            id,
                            email: session.email,
                        },
                        Err(e) => ServiceResponse::AuthFailed {
                            id,
                            message: e.to_string(),
                        },
                    };
                    let _ = response_tx.send(response);
                });
            }

            ServiceCommand::AddRecord {
                id,
                session,
                collection,
                record,
            } => {
                let store = self.providers.store.clone();
                self.active_requests.spawn(async move {
                    let response = match store.add(&session, &collection, &record).await {
                        Ok(document_id) => ServiceResponse::RecordAdded { id, document_id },
                        Err(e) => ServiceResponse::RecordFailed {
                            id,
                            message: e.to_string(),
                        },
                    };
                    let _ = response_tx.send(response);
                });
            }

            ServiceCommand::FetchAlbums { attempt } => {
                let client = self.client.clone();
                let url = self.albums_url.clone();
                self.active_requests.spawn(async move {
                    let state = FetchState::from(fetch_albums(&client, &url).await);
                    tracing::info!(attempt, ok = !matches!(state, FetchState::Error { .. }), "Album fetch finished");
                    let _ = response_tx.send(ServiceResponse::Albums { attempt, state });
                });
            }

            ServiceCommand::FetchLocation { id } => {
                let location = self.providers.location.clone();
                self.active_requests.spawn(async move {
                    let response = match location.last_known().await {
                        Ok(coordinates) => ServiceResponse::Location { id, coordinates },
                        Err(e) => ServiceResponse::LocationFailed {
                            id,
                            message: e.to_string(),
                        },
                    };
                    let _ = response_tx.send(response);
                });
            }

            ServiceCommand::Shutdown => {}
        }
    }
}
