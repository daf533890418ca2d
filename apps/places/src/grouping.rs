use chrono::{DateTime, Utc};
use futures::future::join_all;
use indexmap::IndexMap;
use tracing::debug;

use crate::geo::{ClusterKey, Coordinate, GeocodeService};
use crate::models::{LocationGroup, NearbyPhoto, PhotoInput, TimeGroup};
use crate::utils::datetime::{bucket, parse_datetime};

struct Cluster<'a> {
    members: Vec<(&'a str, Coordinate)>,
}

impl Cluster<'_> {
    fn representative(&self) -> Coordinate {
        self.members[0].1
    }
}

/// Centroid of `points` on the sphere: the mean of their unit vectors, projected back.
/// Groups straddling the antimeridian stay next to their members.
fn mean_coordinate(points: &[Coordinate]) -> Option<Coordinate> {
    if points.is_empty() {
        return None;
    }

    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for point in points {
        let (lat, lng) = (point.latitude().to_radians(), point.longitude().to_radians());
        x += lat.cos() * lng.cos();
        y += lat.cos() * lng.sin();
        z += lat.sin();
    }

    // Antipodal members cancel out and leave no meaningful centre.
    if x.hypot(y).hypot(z) < 1e-12 {
        return None;
    }

    let lat = z.atan2(x.hypot(y)).to_degrees();
    let lng = y.atan2(x).to_degrees();
    Coordinate::new(lat, lng).ok()
}

/// Group photos by resolved place name.
///
/// Photos are clustered by grid cell and each cell is resolved once; cells
/// that resolve to the same name share a group. Photos without usable GPS and
/// cells with no name end up in a trailing `unknown_label` group.
pub async fn group_by_location(
    service: &GeocodeService,
    photos: &[PhotoInput],
    unknown_label: &str,
) -> Vec<LocationGroup> {
    let mut clusters: IndexMap<ClusterKey, Cluster> = IndexMap::new();
    let mut unknown: Vec<String> = Vec::new();

    for photo in photos {
        match photo.coordinate() {
            Some(coordinate) => clusters
                .entry(coordinate.cluster_key())
                .or_insert_with(|| Cluster {
                    members: Vec::new(),
                })
                .members
                .push((photo.id.as_str(), coordinate)),
            None => unknown.push(photo.id.clone()),
        }
    }

    debug!(
        clusters = clusters.len(),
        without_location = unknown.len(),
        "Resolving photo clusters"
    );

    let names = join_all(clusters.values().map(|cluster| {
        let at = cluster.representative();
        service.resolve(at.latitude(), at.longitude())
    }))
    .await;

    // label -> (cluster keys, member positions, photo ids)
    let mut named: IndexMap<String, (Vec<String>, Vec<Coordinate>, Vec<String>)> =
        IndexMap::new();
    for ((key, cluster), name) in clusters.iter().zip(names) {
        match name {
            Some(label) => {
                let (keys, points, ids) = named.entry(label).or_default();
                keys.push(key.to_string());
                for (id, coordinate) in &cluster.members {
                    points.push(*coordinate);
                    ids.push(id.to_string());
                }
            }
            None => unknown.extend(cluster.members.iter().map(|(id, _)| id.to_string())),
        }
    }

    let mut groups: Vec<LocationGroup> = named
        .into_iter()
        .map(|(label, (cluster_keys, points, photo_ids))| LocationGroup {
            label,
            cluster_keys,
            center: mean_coordinate(&points),
            photo_ids,
        })
        .collect();

    if !unknown.is_empty() {
        groups.push(LocationGroup {
            label: unknown_label.to_string(),
            cluster_keys: Vec::new(),
            center: None,
            photo_ids: unknown,
        });
    }

    groups
}

/// Group photos into recency buckets relative to `now`, newest first.
/// Photos with a missing or unreadable capture time go in a trailing `unknown_label` group.
pub fn group_by_time(
    photos: &[PhotoInput],
    now: DateTime<Utc>,
    unknown_label: &str,
) -> Vec<TimeGroup> {
    let mut dated: Vec<(DateTime<Utc>, &PhotoInput)> = Vec::new();
    let mut unknown: Vec<String> = Vec::new();

    for photo in photos {
        match photo.taken_at.as_deref().and_then(parse_datetime) {
            Some(taken_at) => dated.push((taken_at, photo)),
            None => unknown.push(photo.id.clone()),
        }
    }

    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
    for (taken_at, photo) in dated {
        grouped
            .entry(bucket(taken_at, now).to_string())
            .or_default()
            .push(photo.id.clone());
    }

    let mut groups: Vec<TimeGroup> = grouped
        .into_iter()
        .map(|(label, photo_ids)| TimeGroup { label, photo_ids })
        .collect();

    if !unknown.is_empty() {
        groups.push(TimeGroup {
            label: unknown_label.to_string(),
            photo_ids: unknown,
        });
    }

    groups
}

/// Photos within `radius_km` of `center`, nearest first.
pub fn photos_within(
    photos: &[PhotoInput],
    center: Coordinate,
    radius_km: f64,
) -> Vec<NearbyPhoto> {
    let mut nearby: Vec<NearbyPhoto> = photos
        .iter()
        .filter_map(|photo| {
            let distance_km = photo.coordinate()?.distance_km(&center);
            (distance_km <= radius_km).then(|| NearbyPhoto {
                id: photo.id.clone(),
                distance_km,
            })
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearby
}
