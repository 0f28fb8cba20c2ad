//! Synthetic test scenes.
//!
//! Renders frames with known geometry so the filter chain can be exercised
//! without camera hardware: a dark "shoulder" band at a chosen tilt against a
//! light background, and a flat featureless frame. Used by the `stub://`
//! capture backend and by tests.

use crate::frame::Frame;

const BAND_LUMA: u8 = 40;
const BACKGROUND_LUMA: u8 = 200;
const BAND_HALF_THICKNESS: f32 = 6.0;

/// A frame containing one clear straight band through the image center at
/// `tilt_degrees` from horizontal.
pub fn shoulder_frame(width: u32, height: u32, tilt_degrees: f32) -> Frame {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let tilt = tilt_degrees.to_radians();
    // Unit normal of the band's center line.
    let (nx, ny) = (-tilt.sin(), tilt.cos());

    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            let dist = nx * (x as f32 - cx) + ny * (y as f32 - cy);
            let luma = if dist.abs() <= BAND_HALF_THICKNESS {
                BAND_LUMA
            } else {
                BACKGROUND_LUMA
            };
            data.extend_from_slice(&[luma, luma, luma]);
        }
    }

    Frame::from_rgb(data, width, height).expect("synthetic frame dimensions are consistent")
}

/// A featureless frame of uniform gray level. Produces no edges.
pub fn flat_frame(width: u32, height: u32, luma: u8) -> Frame {
    let data = vec![luma; width as usize * height as usize * 3];
    Frame::from_rgb(data, width, height).expect("synthetic frame dimensions are consistent")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::{detect_edges, EdgeParams};

    #[test]
    fn shoulder_frame_has_band_and_background() {
        let frame = shoulder_frame(64, 64, 0.0);
        let luma = frame.to_luma();

        assert!((luma.get(32, 32) - BAND_LUMA as f32).abs() < 1.0);
        assert!((luma.get(32, 2) - BACKGROUND_LUMA as f32).abs() < 1.0);
    }

    #[test]
    fn flat_frame_produces_no_edges() {
        let frame = flat_frame(64, 64, 24);
        let edges = detect_edges(&frame.to_luma(), &EdgeParams::default());
        assert_eq!(edges.edge_count(), 0);
    }

    #[test]
    fn level_band_produces_horizontal_edges() {
        let frame = shoulder_frame(320, 240, 0.0);
        let edges = detect_edges(&frame.to_luma(), &EdgeParams::default());

        assert!(edges.edge_count() > 0);
        // Both band boundaries are horizontal: every edge pixel sits within a
        // few rows of the band edges around the center.
        for (_, y) in edges.edge_points() {
            assert!((y - 120).abs() <= 9, "edge pixel at unexpected row {}", y);
        }
    }
}
