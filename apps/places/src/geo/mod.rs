mod cache;
mod cluster;
mod distance;
mod rate_limit;
mod resolver;
mod transport;

pub use cache::{PlaceEntry, ReverseGeocodeCache};
pub use cluster::{cluster_key, ClusterKey};
pub use distance::distance_km;
pub use rate_limit::RateLimiter;
pub use resolver::{fallback_label, GeocodeService};
pub use transport::{compose_place_name, Address, GeocodeTransport, NominatimTransport};

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}

/// Reasons a lookup could not produce a parsed address. Never surfaced past
/// [`GeocodeService::resolve`], which turns every variant into a fallback label.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("reverse geocoding is disabled")]
    Disabled,

    #[error("reverse geocoding timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("geocoder responded with status {0}")]
    Status(u16),

    #[error("malformed geocoder response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A validated GPS position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(GeoError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn cluster_key(&self) -> ClusterKey {
        cluster_key(self.latitude, self.longitude)
    }

    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}
