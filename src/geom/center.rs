use geo::Point;

use crate::store::Feature;

/// Run through all the features and average their centroids to pick a
/// default map-view center (the record owner can overwrite it later).
///
/// Exactly-equal centroid pairs are collapsed before averaging, so two
/// features sharing a centroid count once. The result keeps the storage
/// point's (latitude, longitude) coordinate order.
pub fn average_center(features: &[&Feature]) -> Option<Point<f64>> {
    let mut centers: Vec<(f64, f64)> = Vec::new();
    for feature in features {
        let Some(centroid) = feature.geometry.centroid() else {
            continue;
        };
        let pair = (centroid.x(), centroid.y());
        if !centers.contains(&pair) {
            centers.push(pair);
        }
    }

    if centers.is_empty() {
        return None;
    }

    let total = centers.len() as f64;
    let (lon, lat) = centers
        .iter()
        .fold((0.0, 0.0), |(x, y), center| (x + center.0, y + center.1));
    Some(Point::new(lat / total, lon / total))
}
