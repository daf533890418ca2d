use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use crate::app::create_app;
use crate::config::{Config, ReverseGeocodingConfig};
use crate::geo::{Address, GeocodeService, GeocodeTransport, ResolveError};
use crate::models::PhotoInput;

static PHOTO_ID_COUNTER: AtomicI64 = AtomicI64::new(1);

type Responder = Box<dyn Fn(f64, f64) -> Result<Address, ResolveError> + Send + Sync>;

/// Transport double that counts calls and records when each one was dispatched.
pub struct MockTransport {
    responder: Responder,
    delay: Duration,
    calls: AtomicUsize,
    dispatched_at: Mutex<Vec<Instant>>,
}

impl MockTransport {
    pub fn with<F>(responder: F) -> Self
    where
        F: Fn(f64, f64) -> Result<Address, ResolveError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            dispatched_at: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(address: Address) -> Self {
        Self::with(move |_, _| Ok(address.clone()))
    }

    pub fn failing(status: u16) -> Self {
        Self::with(move |_, _| Err(ResolveError::Status(status)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn dispatch_times(&self) -> Vec<Instant> {
        self.dispatched_at.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeocodeTransport for MockTransport {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Address, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dispatched_at.lock().unwrap().push(Instant::now());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.responder)(latitude, longitude)
    }
}

/// Build an [`Address`] from `(field, value)` pairs.
pub fn address(fields: &[(&str, &str)]) -> Address {
    let map: serde_json::Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    serde_json::from_value(Value::Object(map)).expect("Invalid address fixture")
}

pub fn test_service(transport: Arc<dyn GeocodeTransport>) -> GeocodeService {
    test_service_with(transport, &ReverseGeocodingConfig::default())
}

pub fn test_service_with(
    transport: Arc<dyn GeocodeTransport>,
    config: &ReverseGeocodingConfig,
) -> GeocodeService {
    GeocodeService::new(transport, config)
}

/// Create a test app whose geocoder is backed by `transport`, with request spacing disabled
pub fn create_test_app(transport: Arc<dyn GeocodeTransport>) -> Router {
    let mut config = Config::default();
    config.reverse_geocoding.rate_limit_seconds = 0.0;
    let geocoder = Arc::new(test_service_with(transport, &config.reverse_geocoding));
    create_app(Arc::new(config), geocoder)
}

/// Test fixture: a photo with GPS and capture time
pub fn photo(latitude: Option<f64>, longitude: Option<f64>, taken_at: Option<&str>) -> PhotoInput {
    PhotoInput {
        id: PHOTO_ID_COUNTER.fetch_add(1, Ordering::SeqCst).to_string(),
        latitude,
        longitude,
        taken_at: taken_at.map(str::to_string),
    }
}

pub fn photo_at(latitude: f64, longitude: f64) -> PhotoInput {
    photo(Some(latitude), Some(longitude), None)
}

pub fn photo_taken(taken_at: &str) -> PhotoInput {
    photo(None, None, Some(taken_at))
}

pub fn utc(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("Invalid timestamp fixture")
        .with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let mock = MockTransport::returning(address(&[("city", "Paris")]));

        let first = mock.reverse(1.0, 2.0).await.unwrap();
        mock.reverse(3.0, 4.0).await.unwrap();

        assert_eq!(first.city.as_deref(), Some("Paris"));
        assert_eq!(mock.calls(), 2);
        assert_eq!(mock.dispatch_times().len(), 2);
    }

    #[test]
    fn test_sequential_photo_ids() {
        let a: i64 = photo_at(0.0, 0.0).id.parse().unwrap();
        let b: i64 = photo_at(0.0, 0.0).id.parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_create_test_app() {
        let _app = create_test_app(Arc::new(MockTransport::failing(500)));
    }
}
