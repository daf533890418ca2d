use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;

use crate::app::AppState;
use crate::error::{AppError, AppResult};
use crate::grouping::{group_by_location, group_by_time, photos_within};
use crate::models::{
    LocationGroupRequest, LocationGroupResponse, NearbyRequest, NearbyResponse, TimeGroupRequest,
    TimeGroupResponse,
};
use crate::utils::datetime::parse_datetime;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups/location", post(location_groups))
        .route("/groups/time", post(time_groups))
        .route("/photos/nearby", post(nearby_photos))
}

async fn location_groups(
    State(state): State<AppState>,
    Json(req): Json<LocationGroupRequest>,
) -> AppResult<Json<LocationGroupResponse>> {
    let groups = group_by_location(
        &state.geocoder,
        &req.photos,
        &state.config.grouping.unknown_location_label,
    )
    .await;

    Ok(Json(LocationGroupResponse { groups }))
}

async fn time_groups(
    State(state): State<AppState>,
    Json(req): Json<TimeGroupRequest>,
) -> AppResult<Json<TimeGroupResponse>> {
    let now = match req.now.as_deref() {
        Some(raw) => parse_datetime(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Unrecognised timestamp: {}", raw)))?,
        None => Utc::now(),
    };

    let groups = group_by_time(&req.photos, now, &state.config.grouping.unknown_date_label);

    Ok(Json(TimeGroupResponse { groups }))
}

async fn nearby_photos(Json(req): Json<NearbyRequest>) -> AppResult<Json<NearbyResponse>> {
    let center = req.center.validate()?;
    if !req.radius_km.is_finite() || req.radius_km < 0.0 {
        return Err(AppError::Validation(format!(
            "Radius must be a non-negative number of kilometres, got {}",
            req.radius_km
        )));
    }

    Ok(Json(NearbyResponse {
        photos: photos_within(&req.photos, center, req.radius_km),
    }))
}
