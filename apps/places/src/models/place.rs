use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateInput {
    pub latitude: f64,
    pub longitude: f64,
}

impl CoordinateInput {
    pub fn validate(&self) -> AppResult<Coordinate> {
        Ok(Coordinate::new(self.latitude, self.longitude)?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvePlaceResponse {
    pub name: Option<String>,
    pub cluster_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceRequest {
    pub from: CoordinateInput,
    pub to: CoordinateInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResponse {
    pub distance_km: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub entries: usize,
}
