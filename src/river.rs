/// River polyline model.
///
/// A `RiverModel` wraps one continuous polyline in projected coordinates,
/// ordered from the river's upstream end. It answers two questions about an
/// arbitrary point: how far is it from the river, and how far along the
/// river is its point of closest approach. The second is used purely as a
/// 1-D ordering for "downstream of".

use geo::{Closest, ClosestPoint, EuclideanDistance, EuclideanLength, LineString};

use crate::model::FloodError;
use crate::projection::PlanarPoint;

/// Nearest point of a polyline to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approach {
    /// Planar distance from the query point to the polyline.
    pub distance: f64,
    /// Arc length from the polyline start to the nearest point.
    pub position: f64,
}

#[derive(Debug, Clone)]
pub struct RiverModel {
    name: String,
    line: LineString<f64>,
    /// `cumulative[i]` is the arc length from the first vertex to vertex `i`.
    cumulative: Vec<f64>,
}

impl RiverModel {
    /// Builds a river from an already-projected polyline.
    ///
    /// Returns `FloodError::RiverGeometry` if fewer than two points are
    /// supplied, any coordinate is non-finite, or the polyline has no
    /// length at all. Repeated consecutive points are allowed; they form
    /// zero-length segments that never match a query.
    pub fn new(name: impl Into<String>, points: Vec<PlanarPoint>) -> Result<Self, FloodError> {
        let name = name.into();

        if points.len() < 2 {
            return Err(FloodError::RiverGeometry(format!(
                "{}: polyline needs at least 2 points, got {}",
                name,
                points.len()
            )));
        }
        if points.iter().any(|p| !p.x().is_finite() || !p.y().is_finite()) {
            return Err(FloodError::RiverGeometry(format!(
                "{}: polyline contains a non-finite coordinate",
                name
            )));
        }

        let line = LineString::from(points);

        let mut cumulative = Vec::with_capacity(line.0.len());
        let mut total = 0.0;
        cumulative.push(total);
        for segment in line.lines() {
            total += segment.euclidean_length();
            cumulative.push(total);
        }

        if total == 0.0 {
            return Err(FloodError::RiverGeometry(format!(
                "{}: all {} points coincide",
                name,
                line.0.len()
            )));
        }

        Ok(RiverModel { name, line, cumulative })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> &LineString<f64> {
        &self.line
    }

    pub fn vertex_count(&self) -> usize {
        self.line.0.len()
    }

    /// Total arc length of the polyline.
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Planar distance from `point` to the nearest point on the river.
    pub fn distance_to(&self, point: &PlanarPoint) -> f64 {
        self.closest_approach(point).distance
    }

    /// Arc length along the river to the point of closest approach.
    pub fn projected_position(&self, point: &PlanarPoint) -> f64 {
        self.closest_approach(point).position
    }

    /// Both queries in one pass over the segments.
    ///
    /// When several segments are equally near, the first one along the
    /// river wins, so a point equidistant from two reaches is ordered by
    /// the more upstream one.
    pub fn closest_approach(&self, point: &PlanarPoint) -> Approach {
        let mut best = Approach { distance: f64::INFINITY, position: 0.0 };

        for (i, segment) in self.line.lines().enumerate() {
            // Zero-length segments come back indeterminate
            let nearest = match segment.closest_point(point) {
                Closest::Intersection(p) | Closest::SinglePoint(p) => p,
                Closest::Indeterminate => continue,
            };

            let distance = point.euclidean_distance(&nearest);
            if distance < best.distance {
                best = Approach {
                    distance,
                    position: self.cumulative[i] + segment.start_point().euclidean_distance(&nearest),
                };
            }
        }

        best
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_river() -> RiverModel {
        RiverModel::new(
            "Saar",
            vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(5000.0, 0.0)],
        )
        .expect("two-point river should build")
    }

    fn bent_river() -> RiverModel {
        // East 1000, then north 1000
        RiverModel::new(
            "Blies",
            vec![
                PlanarPoint::new(0.0, 0.0),
                PlanarPoint::new(1000.0, 0.0),
                PlanarPoint::new(1000.0, 1000.0),
            ],
        )
        .expect("three-point river should build")
    }

    #[test]
    fn test_river_needs_two_points() {
        let err = RiverModel::new("Prims", vec![PlanarPoint::new(0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, FloodError::RiverGeometry(ref m) if m.contains("Prims")));
    }

    #[test]
    fn test_river_rejects_non_finite_points() {
        let result = RiverModel::new(
            "Nied",
            vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(f64::NAN, 1.0)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_length_sums_segments() {
        assert_eq!(straight_river().length(), 5000.0);
        assert_eq!(bent_river().length(), 2000.0);
    }

    #[test]
    fn test_point_beside_river_projects_perpendicular() {
        let river = straight_river();
        let p = PlanarPoint::new(3000.0, 400.0);
        assert!((river.distance_to(&p) - 400.0).abs() < 1e-9);
        assert!((river.projected_position(&p) - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_past_end_clamps_to_endpoint() {
        let river = straight_river();
        let p = PlanarPoint::new(5300.0, 400.0);
        assert!((river.distance_to(&p) - 500.0).abs() < 1e-9);
        assert_eq!(river.projected_position(&p), 5000.0);

        let before = PlanarPoint::new(-300.0, 0.0);
        assert_eq!(river.projected_position(&before), 0.0);
        assert!((river.distance_to(&before) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_accumulates_across_segments() {
        let river = bent_river();
        let p = PlanarPoint::new(1200.0, 600.0);
        let approach = river.closest_approach(&p);
        assert!((approach.distance - 200.0).abs() < 1e-9);
        assert!((approach.position - 1600.0).abs() < 1e-9);
    }

    #[test]
    fn test_equidistant_point_takes_first_segment() {
        // (500, 500) is 500 from both legs of the bend; the first leg wins.
        let river = bent_river();
        let approach = river.closest_approach(&PlanarPoint::new(500.0, 500.0));
        assert!((approach.distance - 500.0).abs() < 1e-9);
        assert!((approach.position - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_segment_is_harmless() {
        let river = RiverModel::new(
            "Theel",
            vec![
                PlanarPoint::new(0.0, 0.0),
                PlanarPoint::new(0.0, 0.0),
                PlanarPoint::new(100.0, 0.0),
            ],
        )
        .expect("duplicate vertices should be accepted");
        assert_eq!(river.length(), 100.0);
        assert!((river.projected_position(&PlanarPoint::new(40.0, 10.0)) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_river_of_coincident_points_is_rejected() {
        let err = RiverModel::new(
            "Ill",
            vec![PlanarPoint::new(10.0, 10.0), PlanarPoint::new(10.0, 10.0)],
        )
        .unwrap_err();
        assert!(matches!(err, FloodError::RiverGeometry(ref m) if m.contains("coincide")));
    }

    #[test]
    fn test_vertices_are_kept_in_order() {
        let river = bent_river();
        assert_eq!(river.vertex_count(), 3);
        let last = river.line().points().last().expect("three vertices");
        assert_eq!(last, PlanarPoint::new(1000.0, 1000.0));
    }

    #[test]
    fn test_point_on_river_has_zero_distance() {
        let river = straight_river();
        assert_eq!(river.distance_to(&PlanarPoint::new(1234.5, 0.0)), 0.0);
    }
}
