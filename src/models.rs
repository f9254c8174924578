use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A remote album record, same shape as the wire format
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
}

/// A song entered in the add-song form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Song {
    pub author: String,
    pub title: String,
    pub album: String,
    pub year: String,
}

impl Song {
    /// Flat string-keyed record written to the document store
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("author".to_string(), self.author.clone());
        record.insert("title".to_string(), self.title.clone());
        record.insert("album".to_string(), self.album.clone());
        record.insert("year".to_string(), self.year.clone());
        record
    }
}

/// Flat document as stored in a collection
pub type Record = BTreeMap<String, String>;

/// Email/password pair submitted from the login and register forms
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Empty-field check done before contacting the auth provider
    pub fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(String::from("Email and password must not be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Signed-in user as returned by the auth provider
#[derive(Clone)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub id_token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now() >= self.expires_at
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("id_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Last known device coordinate
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lat: {}, Long: {}", self.latitude, self.longitude)
    }
}
