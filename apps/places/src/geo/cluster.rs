use serde::Serialize;
use std::fmt;

use crate::constants::CLUSTER_CELLS_PER_DEGREE;

/// Identifier of a ~0.02° grid cell, rendered as `"<lat>,<lng>"` from the snapped values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClusterKey(String);

impl ClusterKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snap one axis to the grid. Halves round toward positive infinity.
fn snap(value: f64) -> f64 {
    let cell = (value * CLUSTER_CELLS_PER_DEGREE + 0.5).floor();
    // `+ 0.0` folds -0.0 into 0.0 so both sides of the origin share a key
    cell / CLUSTER_CELLS_PER_DEGREE + 0.0
}

/// Derive the cluster key for a coordinate pair.
///
/// No range validation happens here: NaN inputs produce the stable `"NaN,NaN"`
/// key, so callers are expected to go through [`super::Coordinate::new`] first.
pub fn cluster_key(latitude: f64, longitude: f64) -> ClusterKey {
    ClusterKey(format!("{},{}", snap(latitude), snap(longitude)))
}
