use serde::{Deserialize, Serialize};

use super::CoordinateInput;
use crate::geo::Coordinate;

/// A photo as supplied by the library: GPS and capture time are both optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoInput {
    pub id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub taken_at: Option<String>,
}

impl PhotoInput {
    /// The photo's position, if it has one and it is in range.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationGroupRequest {
    pub photos: Vec<PhotoInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationGroup {
    pub label: String,
    pub cluster_keys: Vec<String>,
    pub center: Option<Coordinate>,
    pub photo_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationGroupResponse {
    pub groups: Vec<LocationGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeGroupRequest {
    pub photos: Vec<PhotoInput>,
    #[serde(default)]
    pub now: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeGroup {
    pub label: String,
    pub photo_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeGroupResponse {
    pub groups: Vec<TimeGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyRequest {
    pub center: CoordinateInput,
    pub radius_km: f64,
    pub photos: Vec<PhotoInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPhoto {
    pub id: String,
    pub distance_km: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    pub photos: Vec<NearbyPhoto>,
}
