//! Application constants
//!
//! Centralized location for endpoint paths and configuration defaults.

/// Default base URL of the public album API
pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com/";

/// Resource path appended to the API base URL
pub const ALBUMS_PATH: &str = "albums";

/// Document store collection that receives new songs
pub const SONGS_COLLECTION: &str = "songs";

/// Default Identity Toolkit endpoint used for email/password auth
pub const DEFAULT_FIREBASE_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1/";

/// Default Firestore REST endpoint
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1/";

/// Default IP geolocation lookup
pub const DEFAULT_LOCATION_LOOKUP_URL: &str = "http://ip-api.com/json";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory under $HOME holding config and logs
pub const CONFIG_DIR_NAME: &str = ".songbook";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default log file name inside the config directory
pub const DEFAULT_LOG_FILE: &str = "songbook.log";

/// Application name
pub const APP_NAME: &str = "Songbook";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
