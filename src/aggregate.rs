//! Summary statistics and the ranked location list, recomputed in full on
//! every store update.

use crate::store::GeoPoint;
use std::collections::HashMap;

/// Number of entries in the ranked list.
pub const TOP_LOCATIONS: usize = 10;

/// Points bucketed by coordinates rounded to one decimal place (~11 km at
/// the equator). The representative lat/lng comes from the first point seen
/// in the bucket.
#[derive(Debug, Clone)]
pub struct LocationGroup {
    pub lat: f64,
    pub lng: f64,
    pub count: usize,
    pub suspicious: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub total: usize,
    pub normal: usize,
    pub suspicious: usize,
    pub top: Vec<LocationGroup>,
}

pub fn summarize(points: &[GeoPoint]) -> Summary {
    let total = points.len();
    let suspicious = points.iter().filter(|p| p.suspicious).count();
    let normal = total - suspicious;

    let mut buckets: HashMap<String, LocationGroup> = HashMap::new();
    for p in points {
        let key = format!("{:.1},{:.1}", p.lat, p.lng);
        let group = buckets.entry(key).or_insert(LocationGroup {
            lat: p.lat,
            lng: p.lng,
            count: 0,
            suspicious: 0,
        });
        group.count += 1;
        if p.suspicious {
            group.suspicious += 1;
        }
    }

    // Descending by count. Ties keep whatever order the hash grouping
    // produced, which is not deterministic; fine for a display list.
    let mut top: Vec<LocationGroup> = buckets.into_values().collect();
    top.sort_by(|a, b| b.count.cmp(&a.count));
    top.truncate(TOP_LOCATIONS);

    Summary {
        total,
        normal,
        suspicious,
        top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn point(lat: f64, lng: f64, suspicious: bool) -> GeoPoint {
        GeoPoint {
            lat,
            lng,
            ip: "0.0.0.0".to_string(),
            suspicious,
            received_at: Instant::now(),
        }
    }

    #[test]
    fn counts_add_up() {
        let points = vec![
            point(1.0, 2.0, false),
            point(3.0, 4.0, true),
            point(5.0, 6.0, true),
        ];
        let summary = summarize(&points);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.suspicious, 2);
        assert_eq!(summary.normal + summary.suspicious, summary.total);
    }

    #[test]
    fn empty_input_yields_empty_list() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.top.is_empty());
    }

    #[test]
    fn nearby_points_share_a_bucket() {
        // Both round to 40.7,-74.0.
        let points = vec![point(40.71, -74.0, false), point(40.74, -74.0, true)];
        let summary = summarize(&points);

        assert_eq!(summary.top.len(), 1);
        let group = &summary.top[0];
        assert_eq!(group.count, 2);
        assert_eq!(group.suspicious, 1);
        // Representative coordinates come from the first point in the bucket.
        assert_eq!(group.lat, 40.71);
    }

    #[test]
    fn ranking_is_descending_and_truncated() {
        let mut points = Vec::new();
        for i in 0..15 {
            // Bucket i gets i+1 points.
            for _ in 0..=i {
                points.push(point(i as f64, 0.0, false));
            }
        }
        let summary = summarize(&points);

        assert_eq!(summary.top.len(), TOP_LOCATIONS);
        assert_eq!(summary.top[0].count, 15);
        for pair in summary.top.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn counts_stable_under_permutation() {
        let mut points = vec![
            point(40.71, -74.0, false),
            point(40.74, -74.0, true),
            point(51.5, -0.1, false),
            point(51.52, -0.13, false),
            point(51.54, -0.08, true),
        ];
        let forward = summarize(&points);
        points.reverse();
        let backward = summarize(&points);

        assert_eq!(forward.total, backward.total);
        assert_eq!(forward.suspicious, backward.suspicious);

        let counts = |s: &Summary| {
            let mut c: Vec<(usize, usize)> =
                s.top.iter().map(|g| (g.count, g.suspicious)).collect();
            c.sort();
            c
        };
        assert_eq!(counts(&forward), counts(&backward));
    }

    #[test]
    fn negative_and_positive_buckets_stay_apart() {
        // -0.04 and 0.04 format to -0.0 and 0.0: distinct keys.
        let points = vec![point(-0.04, 10.0, false), point(0.04, 10.0, false)];
        let summary = summarize(&points);
        assert_eq!(summary.top.len(), 2);
    }
}
