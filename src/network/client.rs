//! HTTP client setup shared by the album fetch and the providers

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

use crate::constants::{ALBUMS_PATH, APP_NAME, APP_VERSION};

/// Create an HTTP client with the configured timeout
pub fn create_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(format!("{}/{}", APP_NAME, APP_VERSION))
        .build()
        .context("building HTTP client")
}

/// `<base>/albums`; `base` must end with `/`
pub fn albums_url(base: &Url) -> Result<Url> {
    base.join(ALBUMS_PATH)
        .with_context(|| format!("joining '{}' onto {}", ALBUMS_PATH, base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_base_url;

    #[test]
    fn test_albums_url() {
        let base = parse_base_url("https://jsonplaceholder.typicode.com").unwrap();
        assert_eq!(
            albums_url(&base).unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/albums"
        );
    }
}
