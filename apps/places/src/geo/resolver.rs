use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    cluster_key, compose_place_name, GeocodeTransport, NominatimTransport, PlaceEntry,
    RateLimiter, ResolveError, ReverseGeocodeCache,
};
use crate::config::ReverseGeocodingConfig;

/// Coordinate-derived label used when a lookup fails.
pub fn fallback_label(latitude: f64, longitude: f64) -> String {
    format!("Location ({:.2}°, {:.2}°)", latitude, longitude)
}

/// Resolves coordinates to place names through a cache and a global rate limiter.
///
/// One service is shared by everything that talks to the geocoder; the cache
/// and the limiter are per-service, not process globals.
pub struct GeocodeService {
    transport: Arc<dyn GeocodeTransport>,
    cache: ReverseGeocodeCache,
    limiter: RateLimiter,
    timeout: Duration,
    enabled: bool,
}

impl GeocodeService {
    pub fn new(transport: Arc<dyn GeocodeTransport>, config: &ReverseGeocodingConfig) -> Self {
        Self {
            transport,
            cache: ReverseGeocodeCache::new(),
            limiter: RateLimiter::new(config.min_interval()),
            timeout: config.timeout(),
            enabled: config.enabled,
        }
    }

    /// Service backed by the HTTP geocoder named in `config`.
    pub fn from_config(config: &ReverseGeocodingConfig) -> Result<Self, ResolveError> {
        let transport = NominatimTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    pub fn cache(&self) -> &ReverseGeocodeCache {
        &self.cache
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Best-effort place name for a coordinate.
    ///
    /// Returns the cached entry for the coordinate's cluster when there is one.
    /// Otherwise performs a single rate-limited lookup, shared with any
    /// concurrent callers for the same cluster, and caches its outcome. Failures
    /// become a fallback label; `None` means the geocoder found nothing usable.
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> Option<String> {
        let key = cluster_key(latitude, longitude);
        let slot = self.cache.slot(key.clone());

        if let Some(entry) = slot.get() {
            debug!(cluster = %key, "Place name cache hit");
            return entry.name().map(str::to_string);
        }

        let entry = slot
            .get_or_init(|| async move {
                match self.lookup(latitude, longitude).await {
                    Ok(Some(name)) => PlaceEntry::Named(name),
                    Ok(None) => PlaceEntry::Unnamed,
                    Err(e) => {
                        warn!(cluster = %key, "Reverse geocoding failed: {}", e);
                        PlaceEntry::Fallback(fallback_label(latitude, longitude))
                    }
                }
            })
            .await;

        entry.name().map(str::to_string)
    }

    /// Uncached lookup: waits for a rate-limit slot, calls the transport and
    /// composes the address. Errors are returned as-is.
    pub async fn lookup(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<String>, ResolveError> {
        if !self.enabled {
            return Err(ResolveError::Disabled);
        }

        self.limiter.wait_for_slot().await;

        let request = self.transport.reverse(latitude, longitude);
        let address = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ResolveError::Timeout(self.timeout))??;

        Ok(compose_place_name(&address))
    }
}
