//! Integration tests for the complete detection pipeline
//!
//! These tests run the end-to-end workflow on synthetic frames:
//! - HSV segmentation against configured profiles
//! - Largest-region selection and oriented measurement
//! - Pixel-to-unit conversion through the shared store
//! - Error handling for unknown profiles and empty frames

use color_gauge::{
    calibration, detect, DetectionOutcome, GaugeError, ProfileStore,
};
use image::{Rgb, RgbImage};

const YELLOW_CONFIG: &str = r#"
colors:
  yellow:
    lower: [20, 80, 80]
    upper: [40, 255, 255]
    draw_color: [0, 255, 255]
  red:
    lower1: [0, 120, 70]
    upper1: [10, 255, 255]
    lower2: [170, 120, 70]
    upper2: [180, 255, 255]
    draw_color: [0, 0, 255]
system:
  pixels_per_mm: 1.0
  save_root: saved_images
"#;

fn solid_frame(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, color)
}

// ============================================================================
// End-to-End Detection
// ============================================================================

#[test]
fn solid_yellow_frame_is_detected_and_measured() {
    let store = ProfileStore::from_yaml_str(YELLOW_CONFIG).unwrap();
    let frame = solid_frame(640, 480, Rgb([255, 255, 0]));

    let outcome = detect(&frame, "yellow", &store).unwrap();
    let DetectionOutcome::Found {
        measurement,
        annotated,
    } = outcome
    else {
        panic!("expected a detection on a solid in-range frame");
    };

    // The entire frame is one region, so the measured box covers it.
    let (cx, cy) = measurement.center;
    assert!((cx - 320.0).abs() <= 10.0, "center x was {cx}");
    assert!((cy - 240.0).abs() <= 10.0, "center y was {cy}");
    assert!((measurement.major_px - 640.0).abs() <= 10.0);
    assert!((measurement.minor_px - 480.0).abs() <= 10.0);

    // Scale is 1.0, so unit dimensions match pixel dimensions.
    assert_eq!(measurement.major_units, measurement.major_px);
    assert_eq!(measurement.minor_units, measurement.minor_px);

    // Annotation draws on a copy with the same geometry.
    assert_eq!(annotated.dimensions(), frame.dimensions());
}

#[test]
fn out_of_range_profile_reports_not_found() {
    let store = ProfileStore::from_yaml_str(YELLOW_CONFIG).unwrap();
    let frame = solid_frame(640, 480, Rgb([255, 255, 0]));

    // Yellow pixels fall outside both red hue bands.
    let outcome = detect(&frame, "red", &store).unwrap();
    assert!(!outcome.is_found());
}

#[test]
fn black_frame_reports_not_found() {
    let store = ProfileStore::from_yaml_str(YELLOW_CONFIG).unwrap();
    let frame = solid_frame(320, 240, Rgb([0, 0, 0]));

    let outcome = detect(&frame, "yellow", &store).unwrap();
    assert!(!outcome.is_found());
}

#[test]
fn small_patch_below_minimum_area_is_ignored() {
    let store = ProfileStore::from_yaml_str(YELLOW_CONFIG).unwrap();
    let mut frame = solid_frame(640, 480, Rgb([0, 0, 0]));

    // A 20x20 patch traces out far less than the minimum region area.
    for y in 100..120 {
        for x in 100..120 {
            frame.put_pixel(x, y, Rgb([255, 255, 0]));
        }
    }

    let outcome = detect(&frame, "yellow", &store).unwrap();
    assert!(!outcome.is_found());
}

#[test]
fn object_clipped_by_the_frame_edge_is_still_detected() {
    let store = ProfileStore::from_yaml_str(YELLOW_CONFIG).unwrap();
    let mut frame = solid_frame(640, 480, Rgb([0, 0, 0]));

    // block sharing the frame's top-left corner, so two of its sides lie
    // on the frame border
    for y in 0..150 {
        for x in 0..200 {
            frame.put_pixel(x, y, Rgb([255, 255, 0]));
        }
    }

    let measurement = match detect(&frame, "yellow", &store).unwrap() {
        DetectionOutcome::Found { measurement, .. } => measurement,
        DetectionOutcome::NotFound => panic!("expected a detection"),
    };

    assert!((measurement.center.0 - 100.0).abs() <= 10.0);
    assert!((measurement.center.1 - 75.0).abs() <= 10.0);
    assert!((measurement.major_px - 200.0).abs() <= 10.0);
    assert!((measurement.minor_px - 150.0).abs() <= 10.0);
}

#[test]
fn unknown_profile_is_an_error() {
    let store = ProfileStore::from_yaml_str(YELLOW_CONFIG).unwrap();
    let frame = solid_frame(64, 64, Rgb([0, 0, 0]));

    let err = detect(&frame, "magenta", &store).unwrap_err();
    match err {
        GaugeError::UnknownProfile { name } => assert_eq!(name, "magenta"),
        other => panic!("expected UnknownProfile, got: {other:?}"),
    }
}

// ============================================================================
// Calibration and Scale
// ============================================================================

#[test]
fn calibrated_scale_changes_unit_dimensions() {
    let store = ProfileStore::from_yaml_str(YELLOW_CONFIG).unwrap();
    let frame = solid_frame(640, 480, Rgb([255, 255, 0]));

    let baseline = match detect(&frame, "yellow", &store).unwrap() {
        DetectionOutcome::Found { measurement, .. } => measurement,
        DetectionOutcome::NotFound => panic!("expected a detection"),
    };

    // Two reference points 100 px apart over a 50 mm feature -> 2 px/mm.
    let scale = calibration::pixels_per_unit((100.0, 200.0), (200.0, 200.0), 50.0).unwrap();
    assert_eq!(scale, 2.0);
    store.set_scale(scale).unwrap();

    let scaled = match detect(&frame, "yellow", &store).unwrap() {
        DetectionOutcome::Found { measurement, .. } => measurement,
        DetectionOutcome::NotFound => panic!("expected a detection"),
    };

    // Pixel dimensions are unchanged; unit dimensions halve.
    assert_eq!(scaled.major_px, baseline.major_px);
    assert!((scaled.major_units - baseline.major_units / 2.0).abs() < 1e-3);
    assert!((scaled.minor_units - baseline.minor_units / 2.0).abs() < 1e-3);
}

#[test]
fn rotated_bar_measures_its_true_edges() {
    let store = ProfileStore::from_yaml_str(YELLOW_CONFIG).unwrap();
    let mut frame = solid_frame(400, 400, Rgb([0, 0, 0]));

    // A 200x60 bar rotated 30 degrees around the frame center.
    let (cx, cy) = (200.0f32, 200.0f32);
    let (sin, cos) = 30.0f32.to_radians().sin_cos();
    for y in 0..400u32 {
        for x in 0..400u32 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let u = dx * cos + dy * sin;
            let v = -dx * sin + dy * cos;
            if u.abs() <= 100.0 && v.abs() <= 30.0 {
                frame.put_pixel(x, y, Rgb([255, 255, 0]));
            }
        }
    }

    let measurement = match detect(&frame, "yellow", &store).unwrap() {
        DetectionOutcome::Found { measurement, .. } => measurement,
        DetectionOutcome::NotFound => panic!("expected a detection"),
    };

    assert!((measurement.center.0 - cx).abs() <= 10.0);
    assert!((measurement.center.1 - cy).abs() <= 10.0);
    assert!((measurement.major_px - 200.0).abs() <= 10.0);
    assert!((measurement.minor_px - 60.0).abs() <= 10.0);
}

#[test]
fn largest_of_two_regions_wins() {
    let store = ProfileStore::from_yaml_str(YELLOW_CONFIG).unwrap();
    let mut frame = solid_frame(640, 480, Rgb([0, 0, 0]));

    // Two yellow blocks; only the larger one should be measured.
    for y in 50..150 {
        for x in 50..250 {
            frame.put_pixel(x, y, Rgb([255, 255, 0]));
        }
    }
    for y in 300..360 {
        for x in 400..470 {
            frame.put_pixel(x, y, Rgb([255, 255, 0]));
        }
    }

    let measurement = match detect(&frame, "yellow", &store).unwrap() {
        DetectionOutcome::Found { measurement, .. } => measurement,
        DetectionOutcome::NotFound => panic!("expected a detection"),
    };

    assert!((measurement.center.0 - 150.0).abs() <= 10.0);
    assert!((measurement.center.1 - 100.0).abs() <= 10.0);
    assert!((measurement.major_px - 200.0).abs() <= 10.0);
    assert!((measurement.minor_px - 100.0).abs() <= 10.0);
}
