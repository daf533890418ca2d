use once_cell::sync::Lazy;
use std::path::PathBuf;

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("MOMENTO_PLACES_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/data/places.yaml"))
});

/// Grid cells per degree used when deriving cluster keys (0.02° ≈ 2.2 km at the equator).
pub const CLUSTER_CELLS_PER_DEGREE: f64 = 50.0;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_USER_AGENT: &str = "Momento/1.0 (self-hosted; places)";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_GEOCODER_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_RATE_LIMIT_SECONDS: f64 = 1.0;

pub const UNKNOWN_LOCATION_LABEL: &str = "Unknown Location";
pub const UNKNOWN_DATE_LABEL: &str = "Unknown Date";
