//! Connected region extraction and dominant-region selection
//!
//! Only external contours are considered; holes and nested borders carry no
//! information for the localization task. Region area is the polygon area of
//! the traced boundary (shoelace formula), matching standard contour-area
//! semantics rather than bounding-box area.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

use crate::constants::selection::MIN_REGION_AREA;

/// One external connected component of a mask
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Boundary polygon in image coordinates, in trace order
    pub points: Vec<Point<i32>>,
    /// Shoelace area of the boundary polygon, in square pixels
    pub area: f64,
}

impl Region {
    /// Build a region from a boundary polygon, deriving its area
    pub fn from_points(points: Vec<Point<i32>>) -> Self {
        let area = polygon_area(&points);
        Self { points, area }
    }
}

/// Shoelace / Green's-theorem polygon area
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut acc = 0i64;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        acc += i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y);
    }
    (acc as f64 / 2.0).abs()
}

/// Picks the single largest external region above an area threshold
#[derive(Debug, Clone)]
pub struct RegionSelector {
    min_area: f64,
}

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionSelector {
    /// Selector with the production noise threshold
    pub fn new() -> Self {
        Self {
            min_area: MIN_REGION_AREA,
        }
    }

    /// Selector with a custom area threshold (strict greater-than)
    pub fn with_min_area(min_area: f64) -> Self {
        Self { min_area }
    }

    /// Return the largest external region with area strictly above the
    /// threshold, or `None` when nothing qualifies.
    ///
    /// Equal areas resolve to the contour traced first (raster scan order);
    /// the strict `>` comparison below is what pins that down.
    pub fn select_largest(&self, mask: &GrayImage) -> Option<Region> {
        // Contour tracing only walks boundaries that have background on the
        // outside, so foreground flush against the mask border would vanish.
        // Trace inside a one-pixel zero pad and shift the points back.
        let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
        for (x, y, px) in mask.enumerate_pixels() {
            padded.put_pixel(x + 1, y + 1, *px);
        }

        let mut best: Option<Region> = None;
        for contour in find_contours::<i32>(&padded) {
            if contour.border_type != BorderType::Outer {
                continue;
            }
            let points: Vec<Point<i32>> = contour
                .points
                .iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect();
            let area = polygon_area(&points);
            if area <= self.min_area {
                continue;
            }
            match &best {
                Some(current) if area <= current.area => {}
                _ => best = Some(Region { points, area }),
            }
        }
        if best.is_none() {
            log::debug!("no region above {} px^2", self.min_area);
        }
        best
    }
}
