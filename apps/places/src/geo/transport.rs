use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::ResolveError;
use crate::config::ReverseGeocodingConfig;

/// The `address` object of a reverse-geocoding response. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    pub tourism: Option<String>,
    pub historic: Option<String>,
    pub attraction: Option<String>,
    pub amenity: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub quarter: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Build the most specific label an address allows: `"<specific>, <base>"`,
/// either half alone, or `None` when neither is present.
pub fn compose_place_name(address: &Address) -> Option<String> {
    let specific = first_present(&[
        &address.tourism,
        &address.historic,
        &address.attraction,
        &address.amenity,
        &address.neighbourhood,
        &address.suburb,
        &address.quarter,
    ]);
    let base = first_present(&[
        &address.city,
        &address.town,
        &address.village,
        &address.state,
        &address.country,
    ]);

    match (specific, base) {
        (Some(specific), Some(base)) => Some(format!("{}, {}", specific, base)),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

/// Outbound reverse-geocoding call. Implementations perform exactly one request per call;
/// caching and rate limiting live in [`super::GeocodeService`].
#[async_trait]
pub trait GeocodeTransport: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Address, ResolveError>;
}

/// Nominatim-compatible HTTP transport.
pub struct NominatimTransport {
    client: Client,
    base_url: String,
    language: String,
    timeout: Duration,
}

impl NominatimTransport {
    pub fn new(config: &ReverseGeocodingConfig) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            language: config.language.clone(),
            timeout: config.timeout(),
        })
    }

    fn classify(&self, err: reqwest::Error) -> ResolveError {
        if err.is_timeout() {
            ResolveError::Timeout(self.timeout)
        } else {
            ResolveError::Transport(err)
        }
    }
}

#[async_trait]
impl GeocodeTransport for NominatimTransport {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Address, ResolveError> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("format", "json"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("addressdetails", "1"),
                ("accept-language", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let parsed: ReverseResponse = serde_json::from_str(&body)?;

        Ok(parsed.address.unwrap_or_default())
    }
}
