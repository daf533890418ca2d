use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::app::AppState;
use crate::error::AppResult;
use crate::models::{
    CacheStatsResponse, CoordinateInput, DistanceRequest, DistanceResponse, ResolvePlaceResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/places/resolve", post(resolve_place))
        .route("/places/distance", post(distance))
        .route("/places/cache", get(cache_stats))
}

async fn resolve_place(
    State(state): State<AppState>,
    Json(req): Json<CoordinateInput>,
) -> AppResult<Json<ResolvePlaceResponse>> {
    let coordinate = req.validate()?;
    let name = state
        .geocoder
        .resolve(coordinate.latitude(), coordinate.longitude())
        .await;

    Ok(Json(ResolvePlaceResponse {
        name,
        cluster_key: coordinate.cluster_key().to_string(),
    }))
}

async fn distance(Json(req): Json<DistanceRequest>) -> AppResult<Json<DistanceResponse>> {
    let from = req.from.validate()?;
    let to = req.to.validate()?;

    Ok(Json(DistanceResponse {
        distance_km: from.distance_km(&to),
    }))
}

async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        entries: state.geocoder.cache_len(),
    })
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{address, create_test_app, MockTransport};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn server_with(mock: Arc<MockTransport>) -> TestServer {
        TestServer::new(create_test_app(mock)).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_returns_name_and_key() {
        let mock = Arc::new(MockTransport::returning(address(&[
            ("tourism", "Eiffel Tower"),
            ("city", "Paris"),
        ])));
        let server = server_with(mock.clone());

        let response = server
            .post("/api/v1/places/resolve")
            .json(&json!({ "latitude": 48.8584, "longitude": 2.2945 }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["name"], "Eiffel Tower, Paris");
        assert_eq!(body["clusterKey"], "48.86,2.3");
    }

    #[tokio::test]
    async fn test_resolve_caches_between_requests() {
        let mock = Arc::new(MockTransport::returning(address(&[("city", "Paris")])));
        let server = server_with(mock.clone());

        for lat in [48.8584, 48.8590] {
            server
                .post("/api/v1/places/resolve")
                .json(&json!({ "latitude": lat, "longitude": 2.2945 }))
                .await
                .assert_status_ok();
        }

        assert_eq!(mock.calls(), 1);
        let stats: Value = server.get("/api/v1/places/cache").await.json();
        assert_eq!(stats["entries"], 1);
    }

    #[tokio::test]
    async fn test_resolve_failure_is_still_ok() {
        let server = server_with(Arc::new(MockTransport::failing(503)));

        let response = server
            .post("/api/v1/places/resolve")
            .json(&json!({ "latitude": 12.3456, "longitude": 56.7849 }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["name"], "Location (12.35°, 56.78°)");
    }

    #[tokio::test]
    async fn test_resolve_unnamed_is_null() {
        let server = server_with(Arc::new(MockTransport::returning(Default::default())));

        let body: Value = server
            .post("/api/v1/places/resolve")
            .json(&json!({ "latitude": 0.0, "longitude": -30.0 }))
            .await
            .json();

        assert!(body["name"].is_null());
    }

    #[tokio::test]
    async fn test_resolve_rejects_out_of_range() {
        let mock = Arc::new(MockTransport::returning(Default::default()));
        let server = server_with(mock.clone());

        let response = server
            .post("/api/v1/places/resolve")
            .json(&json!({ "latitude": 91.0, "longitude": 0.0 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().unwrap().contains("Invalid coordinate"));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_distance() {
        let server = server_with(Arc::new(MockTransport::failing(500)));

        let body: Value = server
            .post("/api/v1/places/distance")
            .json(&json!({
                "from": { "latitude": 0.0, "longitude": 0.0 },
                "to": { "latitude": 0.0, "longitude": 90.0 }
            }))
            .await
            .json();

        let km = body["distanceKm"].as_f64().unwrap();
        assert!((km - 10007.5).abs() < 0.5);
    }

    #[tokio::test]
    async fn test_distance_rejects_invalid_endpoint() {
        let server = server_with(Arc::new(MockTransport::failing(500)));

        let response = server
            .post("/api/v1/places/distance")
            .json(&json!({
                "from": { "latitude": 0.0, "longitude": 0.0 },
                "to": { "latitude": 0.0, "longitude": 181.0 }
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
