use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::geo::GeocodeService;
use crate::logging::request_logger;
use crate::routes::api_router;
use crate::VERSION;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub geocoder: Arc<GeocodeService>,
}

#[derive(Serialize)]
struct HealthcheckResponse {
    status: String,
    version: String,
}

async fn healthcheck() -> Json<HealthcheckResponse> {
    Json(HealthcheckResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
    })
}

pub fn create_app(config: Arc<Config>, geocoder: Arc<GeocodeService>) -> Router {
    let state = AppState { config, geocoder };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(api_router());

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logger))
                .layer(cors),
        )
        .with_state(state)
}
