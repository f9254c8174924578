//! Firebase REST clients - Identity Toolkit auth and Firestore writes

use futures_util::future::{BoxFuture, FutureExt};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::models::{Credentials, Record, Session};
use crate::providers::{AuthProvider, ProviderError, RecordStore};

/// Lifetime assumed when the token response omits `expiresIn`
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turn a non-success response into the provider's own message
async fn rejection(resp: reqwest::Response) -> ProviderError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&text)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| format!("Request failed with status {}", status));
    ProviderError::Rejected(message)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str) -> Session {
        let lifetime = self
            .expires_in
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        Session {
            user_id: self.local_id,
            email: if self.email.is_empty() {
                fallback_email.to_string()
            } else {
                self.email
            },
            id_token: self.id_token,
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(lifetime),
        }
    }
}

/// Email/password auth via the Identity Toolkit REST API
#[derive(Debug, Clone)]
pub struct FirebaseAuth {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl FirebaseAuth {
    pub fn new(client: reqwest::Client, base_url: Url, api_key: String) -> Self {
        FirebaseAuth {
            client,
            base_url,
            api_key,
        }
    }

    async fn exchange(&self, action: &str, credentials: &Credentials) -> Result<Session, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::Unavailable(String::from(
                "Firebase API key is not configured",
            )));
        }
        // "./" keeps the colon in "accounts:signUp" from being read as a scheme
        let mut url = self
            .base_url
            .join(&format!("./accounts:{}", action))
            .map_err(|e| ProviderError::Unavailable(format!("Invalid auth URL: {}", e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        tracing::info!(action, email = %credentials.email, "Auth request");
        let resp = self
            .client
            .post(url)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let err = rejection(resp).await;
            tracing::warn!(action, error = %err, "Auth request rejected");
            return Err(err);
        }

        let token: TokenResponse = resp.json().await?;
        Ok(token.into_session(&credentials.email))
    }
}

impl AuthProvider for FirebaseAuth {
    fn sign_in<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Session, ProviderError>> {
        self.exchange("signInWithPassword", credentials).boxed()
    }

    fn sign_up<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Session, ProviderError>> {
        self.exchange("signUp", credentials).boxed()
    }
}

#[derive(Deserialize)]
struct CreatedDocument {
    name: String,
}

/// Document writes via the Firestore REST API
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    base_url: Url,
    project_id: String,
    api_key: String,
}

impl FirestoreStore {
    pub fn new(client: reqwest::Client, base_url: Url, project_id: String, api_key: String) -> Self {
        FirestoreStore {
            client,
            base_url,
            project_id,
            api_key,
        }
    }

    fn collection_url(&self, collection: &str) -> Result<Url, ProviderError> {
        let path = format!(
            "projects/{}/databases/(default)/documents/{}",
            self.project_id, collection
        );
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| ProviderError::Unavailable(format!("Invalid Firestore URL: {}", e)))?;
        if !self.api_key.is_empty() {
            url.query_pairs_mut().append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn add_document(
        &self,
        session: &Session,
        collection: &str,
        record: &Record,
    ) -> Result<String, ProviderError> {
        if self.project_id.is_empty() {
            return Err(ProviderError::Unavailable(String::from(
                "Firebase project id is not configured",
            )));
        }
        let url = self.collection_url(collection)?;

        tracing::info!(collection, user = %session.user_id, "Adding document");
        let resp = self
            .client
            .post(url)
            .bearer_auth(&session.id_token)
            .json(&document_body(record))
            .send()
            .await?;

        if !resp.status().is_success() {
            let err = rejection(resp).await;
            tracing::warn!(collection, error = %err, "Document write rejected");
            return Err(err);
        }

        let created: CreatedDocument = resp.json().await?;
        let id = created
            .name
            .rsplit('/')
            .next()
            .unwrap_or(created.name.as_str())
            .to_string();
        tracing::info!(collection, id = %id, "Document added");
        Ok(id)
    }
}

impl RecordStore for FirestoreStore {
    fn add<'a>(
        &'a self,
        session: &'a Session,
        collection: &'a str,
        record: &'a Record,
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        self.add_document(session, collection, record).boxed()
    }
}

/// Firestore typed-value encoding of a flat string record
fn document_body(record: &Record) -> Value {
    let fields: Map<String, Value> = record
        .iter()
        .map(|(key, value)| (key.clone(), json!({ "stringValue": value })))
        .collect();
    json!({ "fields": fields })
}
