//! Last-known location sources

use futures_util::future::{BoxFuture, FutureExt};
use reqwest::Url;
use serde::Deserialize;

use crate::config::LocationConfig;
use crate::models::Coordinates;
use crate::providers::{LocationSource, ProviderError};

/// Coordinates configured by the user; no fix when either axis is missing
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinates: Option<Coordinates>,
}

impl FixedLocation {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        FixedLocation { coordinates }
    }

    pub fn from_config(config: &LocationConfig) -> Self {
        let coordinates = match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        };
        FixedLocation { coordinates }
    }
}

impl LocationSource for FixedLocation {
    fn last_known(&self) -> BoxFuture<'_, Result<Option<Coordinates>, ProviderError>> {
        let coordinates = self.coordinates;
        async move { Ok::<_, ProviderError>(coordinates) }.boxed()
    }
}

#[derive(Deserialize)]
struct IpLookup {
    #[serde(default)]
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Approximate location from an IP geolocation service (`ip-api.com` shape)
#[derive(Debug, Clone)]
pub struct IpLocation {
    client: reqwest::Client,
    url: Url,
}

impl IpLocation {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        IpLocation { client, url }
    }

    async fn lookup(&self) -> Result<Option<Coordinates>, ProviderError> {
        tracing::info!(url = %self.url, "Looking up location");
        let resp = self.client.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Rejected(format!(
                "Location lookup failed with status {}",
                status.as_u16()
            )));
        }

        let lookup: IpLookup = resp.json().await?;
        if lookup.status == "fail" {
            tracing::warn!("Location service has no fix for this address");
            return Ok(None);
        }
        Ok(match (lookup.lat, lookup.lon) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        })
    }
}

impl LocationSource for IpLocation {
    fn last_known(&self) -> BoxFuture<'_, Result<Option<Coordinates>, ProviderError>> {
        self.lookup().boxed()
    }
}
