//! Oriented bounding geometry and pixel-to-unit conversion
//!
//! Fits the minimum-area rotated rectangle to a region's boundary points.
//! The optimal rectangle has one side collinear with a convex hull edge, so
//! the fit walks hull edges (rotating calipers) and keeps the smallest
//! candidate. The rectangle center is the reported center; image-moment
//! centroids of the raw region are not used.

use imageproc::geometry::convex_hull;
use imageproc::point::Point;

use crate::constants::measurement::EDGE_DIM_TOLERANCE_PX;
use crate::region::Region;

/// Which dimension an edge label reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    /// The longer rectangle side ("L")
    Major,
    /// The shorter rectangle side ("W")
    Minor,
}

/// Geometry of one rectangle edge, used for label placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeInfo {
    /// Edge length in pixels
    pub length: f32,
    /// Edge midpoint in image coordinates
    pub midpoint: (f32, f32),
    /// Edge direction in degrees, normalized into (-90, 90] so text drawn
    /// along the edge is never upside-down
    pub angle_deg: f32,
}

/// A dimension label assigned to one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLabel {
    pub kind: DimensionKind,
    /// Index into [`OrientedMeasurement::edges`]
    pub edge: usize,
}

/// Oriented bounding rectangle of a region with physical-unit dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedMeasurement {
    /// Rectangle centroid (not necessarily the region centroid)
    pub center: (f32, f32),
    /// Corners in consistent winding order
    pub corners: [(f32, f32); 4],
    /// Longer side length in pixels
    pub major_px: f32,
    /// Shorter side length in pixels
    pub minor_px: f32,
    /// Longer side in physical units (`major_px / pixels_per_unit`)
    pub major_units: f32,
    /// Shorter side in physical units
    pub minor_units: f32,
    /// Per-edge geometry, edge i running corner\[i\] -> corner\[(i+1) % 4\]
    pub edges: [EdgeInfo; 4],
    /// At most one Major and one Minor label, first qualifying edge each
    pub labels: Vec<EdgeLabel>,
}

impl OrientedMeasurement {
    /// Dimension value in physical units for a label kind
    pub fn dimension(&self, kind: DimensionKind) -> f32 {
        match kind {
            DimensionKind::Major => self.major_units,
            DimensionKind::Minor => self.minor_units,
        }
    }
}

/// Fits oriented rectangles and converts pixels to physical units
#[derive(Debug, Clone)]
pub struct Measurer {
    edge_tolerance_px: f32,
}

impl Default for Measurer {
    fn default() -> Self {
        Self::new()
    }
}

impl Measurer {
    pub fn new() -> Self {
        Self {
            edge_tolerance_px: EDGE_DIM_TOLERANCE_PX,
        }
    }

    /// Measure a region under the given calibration scale.
    ///
    /// A non-positive scale means no physical conversion (factor 1.0).
    /// Degenerate regions yield dimensions near zero rather than an error;
    /// disregarding those is the caller's call.
    pub fn measure(&self, region: &Region, pixels_per_unit: f32) -> OrientedMeasurement {
        let scale = if pixels_per_unit.is_finite() && pixels_per_unit > 0.0 {
            pixels_per_unit
        } else {
            1.0
        };

        let corners = min_area_rect(&region.points);

        let center = (
            (corners[0].0 + corners[1].0 + corners[2].0 + corners[3].0) / 4.0,
            (corners[0].1 + corners[1].1 + corners[2].1 + corners[3].1) / 4.0,
        );

        let edges = std::array::from_fn(|i| {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            let (dx, dy) = (b.0 - a.0, b.1 - a.1);
            EdgeInfo {
                length: (dx * dx + dy * dy).sqrt(),
                midpoint: ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0),
                angle_deg: normalize_angle(dy.atan2(dx).to_degrees()),
            }
        });

        let side_a = edges[0].length;
        let side_b = edges[1].length;
        let major_px = side_a.max(side_b);
        let minor_px = side_a.min(side_b);

        let mut labels = Vec::with_capacity(2);
        let mut have_major = false;
        let mut have_minor = false;
        for (i, edge) in edges.iter().enumerate() {
            if !have_major && (edge.length - major_px).abs() < self.edge_tolerance_px {
                labels.push(EdgeLabel {
                    kind: DimensionKind::Major,
                    edge: i,
                });
                have_major = true;
            } else if !have_minor && (edge.length - minor_px).abs() < self.edge_tolerance_px {
                labels.push(EdgeLabel {
                    kind: DimensionKind::Minor,
                    edge: i,
                });
                have_minor = true;
            }
        }

        OrientedMeasurement {
            center,
            corners,
            major_px,
            minor_px,
            major_units: major_px / scale,
            minor_units: minor_px / scale,
            edges,
            labels,
        }
    }
}

/// Normalize a direction angle in degrees into (-90, 90]
pub fn normalize_angle(mut deg: f32) -> f32 {
    while deg > 90.0 {
        deg -= 180.0;
    }
    while deg <= -90.0 {
        deg += 180.0;
    }
    deg
}

/// Minimum-area enclosing rotated rectangle of a point set.
///
/// Corners come back in winding order starting from the support corner of
/// the optimal hull edge. Collinear and single-point inputs degenerate to a
/// zero-width (or zero-size) rectangle.
pub fn min_area_rect(points: &[Point<i32>]) -> [(f32, f32); 4] {
    let segment = |a: Point<i32>, b: Point<i32>| {
        let a = (a.x as f32, a.y as f32);
        let b = (b.x as f32, b.y as f32);
        [a, b, b, a]
    };

    match points {
        [] => return [(0.0, 0.0); 4],
        [p] => return segment(*p, *p),
        [p, q] => return segment(*p, *q),
        _ => {}
    }

    let hull = convex_hull(points);
    if hull.len() < 3 {
        // All points collinear (or identical): span the extreme pair
        let first = hull.first().copied().unwrap_or(points[0]);
        let last = hull.last().copied().unwrap_or(points[0]);
        return segment(first, last);
    }

    let hull: Vec<(f64, f64)> = hull
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();

    let mut best_area = f64::INFINITY;
    let mut best: [(f32, f32); 4] = [(0.0, 0.0); 4];

    for i in 0..hull.len() {
        let p = hull[i];
        let q = hull[(i + 1) % hull.len()];
        let (ex, ey) = (q.0 - p.0, q.1 - p.1);
        let len = (ex * ex + ey * ey).sqrt();
        if len == 0.0 {
            continue;
        }
        // Unit axes: u along the edge, v perpendicular
        let (ux, uy) = (ex / len, ey / len);
        let (vx, vy) = (-uy, ux);

        let (mut s_min, mut s_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut t_min, mut t_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in &hull {
            let (rx, ry) = (x - p.0, y - p.1);
            let s = rx * ux + ry * uy;
            let t = rx * vx + ry * vy;
            s_min = s_min.min(s);
            s_max = s_max.max(s);
            t_min = t_min.min(t);
            t_max = t_max.max(t);
        }

        let area = (s_max - s_min) * (t_max - t_min);
        if area < best_area {
            best_area = area;
            let corner = |s: f64, t: f64| {
                (
                    (p.0 + ux * s + vx * t) as f32,
                    (p.1 + uy * s + vy * t) as f32,
                )
            };
            best = [
                corner(s_min, t_min),
                corner(s_max, t_min),
                corner(s_max, t_max),
                corner(s_min, t_max),
            ];
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_region(w: i32, h: i32) -> Region {
        Region::from_points(vec![
            Point::new(0, 0),
            Point::new(w, 0),
            Point::new(w, h),
            Point::new(0, h),
        ])
    }

    #[test]
    fn axis_aligned_rectangle_measures_exactly() {
        let m = Measurer::new().measure(&rect_region(200, 100), 1.0);
        assert!((m.major_px - 200.0).abs() < 1e-3);
        assert!((m.minor_px - 100.0).abs() < 1e-3);
        assert!((m.center.0 - 100.0).abs() < 1e-3);
        assert!((m.center.1 - 50.0).abs() < 1e-3);
    }

    #[test]
    fn calibration_scale_divides_dimensions() {
        let m = Measurer::new().measure(&rect_region(200, 100), 10.0);
        assert!((m.major_units - 20.0).abs() < 1e-3);
        assert!((m.minor_units - 10.0).abs() < 1e-3);
        // pixel dimensions stay untouched
        assert!((m.major_px - 200.0).abs() < 1e-3);
    }

    #[test]
    fn non_positive_scale_means_pixel_units() {
        let m = Measurer::new().measure(&rect_region(200, 100), 0.0);
        assert!((m.major_units - 200.0).abs() < 1e-3);
    }

    #[test]
    fn rotated_rectangle_recovers_side_lengths() {
        // 45-degree square of diagonal 100: corners of a diamond
        let region = Region::from_points(vec![
            Point::new(50, 0),
            Point::new(100, 50),
            Point::new(50, 100),
            Point::new(0, 50),
        ]);
        let m = Measurer::new().measure(&region, 1.0);
        let side = (2.0f32).sqrt() * 50.0;
        assert!((m.major_px - side).abs() < 0.5, "major {}", m.major_px);
        assert!((m.minor_px - side).abs() < 0.5, "minor {}", m.minor_px);
        assert!((m.center.0 - 50.0).abs() < 0.5);
        assert!((m.center.1 - 50.0).abs() < 0.5);
    }

    #[test]
    fn fit_minimizes_area_over_rotations() {
        // A thin slanted bar: the oriented fit must beat the axis-aligned box
        let region = Region::from_points(vec![
            Point::new(0, 0),
            Point::new(4, -4),
            Point::new(104, 96),
            Point::new(100, 100),
        ]);
        let m = Measurer::new().measure(&region, 1.0);
        let fitted_area = m.major_px * m.minor_px;
        let aabb_area = 104.0 * 104.0;
        assert!(fitted_area < aabb_area / 2.0, "area {}", fitted_area);
    }

    #[test]
    fn major_and_minor_edges_are_each_labelled_once() {
        let m = Measurer::new().measure(&rect_region(200, 100), 1.0);
        assert_eq!(m.labels.len(), 2);
        let majors = m
            .labels
            .iter()
            .filter(|l| l.kind == DimensionKind::Major)
            .count();
        assert_eq!(majors, 1);
        // the labelled edges really have the labelled lengths
        for label in &m.labels {
            let len = m.edges[label.edge].length;
            let expect = match label.kind {
                DimensionKind::Major => m.major_px,
                DimensionKind::Minor => m.minor_px,
            };
            assert!((len - expect).abs() < 10.0);
        }
    }

    #[test]
    fn near_square_shape_still_gets_one_label_per_kind() {
        let m = Measurer::new().measure(&rect_region(105, 100), 1.0);
        assert_eq!(m.labels.len(), 2);
        assert_eq!(m.labels[0].edge, 0);
        assert_eq!(m.labels[1].edge, 1);
    }

    #[test]
    fn angles_normalize_into_half_open_interval() {
        assert!((normalize_angle(170.0) - (-10.0)).abs() < 1e-4);
        assert!((normalize_angle(-170.0) - 10.0).abs() < 1e-4);
        assert!((normalize_angle(90.0) - 90.0).abs() < 1e-4);
        assert!((normalize_angle(-90.0) - 90.0).abs() < 1e-4);
        assert!((normalize_angle(0.0) - 0.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_region_measures_near_zero() {
        let region = Region::from_points(vec![Point::new(10, 10), Point::new(30, 10)]);
        let m = Measurer::new().measure(&region, 1.0);
        assert!(m.minor_px < 1e-3);
        assert!((m.major_px - 20.0).abs() < 1e-3);
    }
}
