//! Annotation rendering onto a copy of the source frame
//!
//! Draws the oriented box, a center cross and counter-rotated dimension
//! labels. The source frame is never touched; every call returns a fresh
//! image. Label placement that falls outside the frame is silently skipped,
//! never clipped ungracefully and never an error.

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::config::ColorProfile;
use crate::constants::annotation;
use crate::measure::{DimensionKind, OrientedMeasurement};

static FONT_BYTES: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

fn font() -> Option<&'static FontRef<'static>> {
    use std::sync::OnceLock;
    static FONT: OnceLock<Option<FontRef<'static>>> = OnceLock::new();
    FONT.get_or_init(|| match FontRef::try_from_slice(FONT_BYTES) {
        Ok(font) => Some(font),
        Err(err) => {
            log::error!("bundled font failed to parse, labels disabled: {err}");
            None
        }
    })
    .as_ref()
}

/// Draws measurement overlays in a profile's draw color
#[derive(Debug, Clone)]
pub struct Annotator {
    label_offset: f32,
    label_scale: f32,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator {
    pub fn new() -> Self {
        Self {
            label_offset: annotation::LABEL_OFFSET_PX,
            label_scale: annotation::LABEL_TEXT_SCALE,
        }
    }

    /// Render box, center marker, dimension labels and the profile name onto
    /// a copy of `frame`.
    pub fn annotate(
        &self,
        frame: &RgbImage,
        measurement: &OrientedMeasurement,
        profile: &ColorProfile,
    ) -> RgbImage {
        let mut out = frame.clone();
        let color = profile.draw_color_rgb();

        self.draw_box(&mut out, measurement, color);
        self.draw_center_cross(&mut out, measurement.center, color);
        for label in &measurement.labels {
            self.draw_edge_label(&mut out, measurement, label.kind, label.edge, color);
        }
        self.draw_profile_name(&mut out, measurement, &profile.name, color);
        out
    }

    fn draw_box(&self, out: &mut RgbImage, m: &OrientedMeasurement, color: Rgb<u8>) {
        for i in 0..4 {
            draw_line_segment_mut(out, m.corners[i], m.corners[(i + 1) % 4], color);
        }
    }

    fn draw_center_cross(&self, out: &mut RgbImage, center: (f32, f32), color: Rgb<u8>) {
        let (cx, cy) = center;
        let r = annotation::CROSS_HALF_LEN;
        draw_line_segment_mut(out, (cx - r, cy), (cx + r, cy), color);
        draw_line_segment_mut(out, (cx, cy - r), (cx, cy + r), color);
    }

    /// Rotated "L:<value>" / "W:<value>" label, pushed outward from the box
    /// center through the edge midpoint so it clears the outline.
    fn draw_edge_label(
        &self,
        out: &mut RgbImage,
        m: &OrientedMeasurement,
        kind: DimensionKind,
        edge: usize,
        color: Rgb<u8>,
    ) {
        let Some(font) = font() else { return };

        let value = m.dimension(kind);
        let text = match kind {
            DimensionKind::Major => format!("L:{value:.1}"),
            DimensionKind::Minor => format!("W:{value:.1}"),
        };

        let info = m.edges[edge];
        let (mx, my) = info.midpoint;
        let (dx, dy) = (mx - m.center.0, my - m.center.1);
        let dist = (dx * dx + dy * dy).sqrt();
        // Degenerate box: midpoint coincides with center, park the label above
        let (nx, ny) = if dist > f32::EPSILON {
            (dx / dist, dy / dist)
        } else {
            (0.0, -1.0)
        };
        let anchor = (mx + nx * self.label_offset, my + ny * self.label_offset);

        let scale = PxScale::from(self.label_scale);
        let (tw, th) = text_size(scale, font, &text);

        // Render into a transparent square large enough for any rotation,
        // rotate so the baseline runs parallel to the edge, then composite.
        let side = tw + th + 4;
        let mut canvas = RgbaImage::from_pixel(side, side, Rgba([0, 0, 0, 0]));
        draw_text_mut(
            &mut canvas,
            Rgba([color.0[0], color.0[1], color.0[2], 255]),
            ((side - tw) / 2) as i32,
            ((side - th) / 2) as i32,
            scale,
            font,
            &text,
        );
        let rotated = rotate_about_center(
            &canvas,
            info.angle_deg.to_radians(),
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        );

        blit_alpha(out, &rotated, anchor.0 - side as f32 / 2.0, anchor.1 - side as f32 / 2.0);
    }

    /// Profile name above the topmost box corner, clamped on-frame
    fn draw_profile_name(
        &self,
        out: &mut RgbImage,
        m: &OrientedMeasurement,
        name: &str,
        color: Rgb<u8>,
    ) {
        let Some(font) = font() else { return };

        let top = m
            .corners
            .iter()
            .copied()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or(m.center);

        let scale = PxScale::from(annotation::NAME_TEXT_SCALE);
        let (tw, th) = text_size(scale, font, name);

        let max_x = out.width().saturating_sub(tw) as i32;
        let max_y = out.height().saturating_sub(th) as i32;
        let x = (top.0 as i32).clamp(0, max_x.max(0));
        let y = (top.1 as i32 - annotation::NAME_OFFSET_PX).clamp(0, max_y.max(0));
        draw_text_mut(out, color, x, y, scale, font, name);
    }
}

/// Alpha-composite `src` onto `dst` with its top-left corner at (x0, y0),
/// dropping pixels that land outside the destination.
fn blit_alpha(dst: &mut RgbImage, src: &RgbaImage, x0: f32, y0: f32) {
    let (w, h) = (dst.width() as i64, dst.height() as i64);
    let (x0, y0) = (x0.round() as i64, y0.round() as i64);

    // Entirely off-frame: nothing to draw
    if x0 + i64::from(src.width()) <= 0 || y0 + i64::from(src.height()) <= 0 || x0 >= w || y0 >= h {
        return;
    }

    for (sx, sy, px) in src.enumerate_pixels() {
        let a = px.0[3];
        if a == 0 {
            continue;
        }
        let tx = x0 + i64::from(sx);
        let ty = y0 + i64::from(sy);
        if tx < 0 || ty < 0 || tx >= w || ty >= h {
            continue;
        }
        let dst_px = dst.get_pixel_mut(tx as u32, ty as u32);
        let alpha = f32::from(a) / 255.0;
        for c in 0..3 {
            let blended = f32::from(px.0[c]) * alpha + f32::from(dst_px.0[c]) * (1.0 - alpha);
            dst_px.0[c] = blended.round() as u8;
        }
    }
}
