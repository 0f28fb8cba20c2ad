//! Line extractor: probabilistic Hough transform over a binary edge map.
//!
//! Edge pixels are consumed in random order. Each sampled pixel votes across
//! the full angle range; once its best bin reaches `votes_threshold`, the
//! candidate line is traced through the edge mask in both directions,
//! tolerating gaps up to `max_gap` pixels. A trace whose coordinate span
//! reaches `min_length` is emitted as a segment; either way the traced pixels
//! are consumed so they cannot seed another candidate.
//!
//! The sampling RNG is seeded with a fixed value, so a fixed edge map and
//! fixed parameters always produce the same segment list.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::edges::EdgeMap;

// Fixed seed for the pixel-sampling RNG. Determinism, not secrecy.
const SAMPLING_SEED: u64 = 0x7570_7269_6768_74;

/// A detected straight-line segment, endpoint coordinates in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Angle from horizontal in degrees, via `atan2(dy, dx)`. Range (-180, 180].
    pub fn angle_degrees(&self) -> f32 {
        let dy = (self.y2 - self.y1) as f32;
        let dx = (self.x2 - self.x1) as f32;
        dy.atan2(dx).to_degrees()
    }
}

/// Parameters of the probabilistic Hough transform.
#[derive(Clone, Copy, Debug)]
pub struct LineParams {
    /// Distance resolution of the accumulator, in pixels.
    pub rho: f32,
    /// Angle resolution of the accumulator, in radians.
    pub theta_step: f32,
    /// Accumulator votes required before a candidate line is traced.
    pub votes_threshold: i32,
    /// Minimum coordinate span for an emitted segment, in pixels.
    pub min_length: i32,
    /// Maximum run of non-edge pixels bridged while tracing, in pixels.
    pub max_gap: i32,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta_step: std::f32::consts::PI / 180.0,
            votes_threshold: 100,
            min_length: 50,
            max_gap: 10,
        }
    }
}

/// Scan an edge map for straight-line segments.
pub fn detect_segments(edges: &EdgeMap, params: &LineParams) -> Vec<LineSegment> {
    let w = edges.w as i32;
    let h = edges.h as i32;
    let mut points = edges.edge_points();
    if points.is_empty() {
        return Vec::new();
    }

    let num_angle = (std::f32::consts::PI / params.theta_step).round().max(1.0) as usize;
    let num_rho = (((w + h) * 2) as f32 / params.rho).round() as usize + 1;
    let rho_offset = (num_rho as i32 - 1) / 2;

    // Precomputed (cos, sin) per angle bin, scaled by 1/rho.
    let trig: Vec<(f32, f32)> = (0..num_angle)
        .map(|n| {
            let theta = n as f32 * params.theta_step;
            (theta.cos() / params.rho, theta.sin() / params.rho)
        })
        .collect();

    let mut accum = vec![0i32; num_angle * num_rho];
    let mut mask = edges.clone();
    let mut segments = Vec::new();
    let mut rng = StdRng::seed_from_u64(SAMPLING_SEED);

    while !points.is_empty() {
        let idx = rng.gen_range(0..points.len());
        let (x, y) = points.swap_remove(idx);

        // Consumed by an earlier trace.
        if !mask.is_edge(x as usize, y as usize) {
            continue;
        }

        // Vote across all angles; track this pixel's best bin.
        let mut best_votes = 0;
        let mut best_angle = 0usize;
        for (n, &(cos_t, sin_t)) in trig.iter().enumerate() {
            let r = (x as f32 * cos_t + y as f32 * sin_t).round() as i32 + rho_offset;
            let votes = &mut accum[n * num_rho + r as usize];
            *votes += 1;
            if *votes > best_votes {
                best_votes = *votes;
                best_angle = n;
            }
        }
        if best_votes < params.votes_threshold {
            continue;
        }

        // Unit direction of the candidate line (perpendicular to its normal),
        // normalized so the dominant component steps one pixel at a time.
        let theta = best_angle as f32 * params.theta_step;
        let (a, b) = (-theta.sin(), theta.cos());
        let (dx, dy) = if a.abs() > b.abs() {
            (a.signum(), b / a.abs())
        } else {
            (a / b.abs(), b.signum())
        };

        // Trace both directions to find the endpoints.
        let mut ends = [(x, y); 2];
        for (side, end) in ends.iter_mut().enumerate() {
            let (sx, sy) = if side == 0 { (dx, dy) } else { (-dx, -dy) };
            let mut fx = x as f32;
            let mut fy = y as f32;
            let mut gap = 0;
            loop {
                fx += sx;
                fy += sy;
                let xi = fx.round() as i32;
                let yi = fy.round() as i32;
                if xi < 0 || yi < 0 || xi >= w || yi >= h {
                    break;
                }
                if mask.is_edge(xi as usize, yi as usize) {
                    gap = 0;
                    *end = (xi, yi);
                } else {
                    gap += 1;
                    if gap > params.max_gap {
                        break;
                    }
                }
            }
        }

        let good_line = (ends[0].0 - ends[1].0).abs() >= params.min_length
            || (ends[0].1 - ends[1].1).abs() >= params.min_length;

        // Consume the traced pixels; un-vote them when the line is emitted so
        // their support does not promote further candidates.
        for (side, end) in ends.iter().enumerate() {
            let (sx, sy) = if side == 0 { (dx, dy) } else { (-dx, -dy) };
            let mut fx = x as f32;
            let mut fy = y as f32;
            loop {
                let xi = fx.round() as i32;
                let yi = fy.round() as i32;
                if mask.is_edge(xi as usize, yi as usize) {
                    mask.clear_edge(xi as usize, yi as usize);
                    if good_line {
                        for (n, &(cos_t, sin_t)) in trig.iter().enumerate() {
                            let r = (xi as f32 * cos_t + yi as f32 * sin_t).round() as i32
                                + rho_offset;
                            accum[n * num_rho + r as usize] -= 1;
                        }
                    }
                }
                if (xi, yi) == *end {
                    break;
                }
                fx += sx;
                fy += sy;
            }
        }

        if good_line {
            segments.push(LineSegment::new(ends[0].0, ends[0].1, ends[1].0, ends[1].1));
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::EdgeMap;

    fn horizontal_map() -> EdgeMap {
        let mut edges = EdgeMap::new(320, 240);
        for x in 10..=300 {
            edges.set_edge(x, 100);
        }
        edges
    }

    #[test]
    fn empty_map_yields_no_segments() {
        let edges = EdgeMap::new(320, 240);
        assert!(detect_segments(&edges, &LineParams::default()).is_empty());
    }

    #[test]
    fn horizontal_row_yields_one_flat_segment() {
        let segments = detect_segments(&horizontal_map(), &LineParams::default());

        assert_eq!(segments.len(), 1);
        let seg = segments[0];
        assert_eq!(seg.y1, 100);
        assert_eq!(seg.y2, 100);
        assert!((seg.x2 - seg.x1).abs() >= 280);
        assert!(seg.angle_degrees().abs() < 0.5);
    }

    #[test]
    fn detection_is_deterministic() {
        let first = detect_segments(&horizontal_map(), &LineParams::default());
        let second = detect_segments(&horizontal_map(), &LineParams::default());
        assert_eq!(first, second);
    }

    #[test]
    fn diagonal_run_spans_its_corners() {
        let mut edges = EdgeMap::new(256, 256);
        for i in 10..200 {
            edges.set_edge(i, i);
        }

        let segments = detect_segments(&edges, &LineParams::default());
        assert_eq!(segments.len(), 1);

        let seg = segments[0];
        let mut xs = [seg.x1, seg.x2];
        xs.sort_unstable();
        assert!(xs[0] <= 12 && xs[1] >= 197);
        // Diagonal in either endpoint order: 45 or 135 degrees off horizontal.
        let angle = seg.angle_degrees().abs();
        assert!((angle - 45.0).abs() < 2.0 || (angle - 135.0).abs() < 2.0);
    }

    #[test]
    fn short_runs_are_discarded() {
        let mut edges = EdgeMap::new(320, 240);
        for x in 10..40 {
            edges.set_edge(x, 100);
        }

        // 30 pixels is under min_length, and under votes_threshold anyway.
        assert!(detect_segments(&edges, &LineParams::default()).is_empty());
    }

    #[test]
    fn traced_runs_under_min_length_are_discarded_but_consumed() {
        // Low votes threshold so the 100-pixel run IS traced, high min_length
        // so the trace is discarded. Its pixels must be consumed all the same
        // and must not resurface as a second candidate.
        let params = LineParams {
            votes_threshold: 20,
            min_length: 200,
            ..LineParams::default()
        };

        let mut edges = EdgeMap::new(320, 240);
        for x in 10..110 {
            edges.set_edge(x, 50);
        }
        assert!(detect_segments(&edges, &params).is_empty());

        // A long vertical line alongside the short run: only the long one
        // comes back, unaffected by the discarded trace.
        for y in 10..230 {
            edges.set_edge(200, y);
        }
        let segments = detect_segments(&edges, &params);
        assert_eq!(segments.len(), 1);
        let seg = segments[0];
        assert_eq!(seg.x1, 200);
        assert_eq!(seg.x2, 200);
        assert!((seg.angle_degrees().abs() - 90.0).abs() < 0.5);
        assert!((seg.y2 - seg.y1).abs() >= 200);
    }

    #[test]
    fn gaps_within_tolerance_are_bridged() {
        let mut edges = EdgeMap::new(320, 240);
        for x in 10..=300 {
            // Drop 5-pixel holes every 40 pixels.
            if x % 40 < 35 {
                edges.set_edge(x, 100);
            }
        }

        let segments = detect_segments(&edges, &LineParams::default());
        assert_eq!(segments.len(), 1);
        assert!((segments[0].x2 - segments[0].x1).abs() >= 250);
    }
}
