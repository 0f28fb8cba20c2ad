//! Edge filter: Sobel gradients, non-maximum suppression, hysteresis.
//!
//! Converts a luminance image into a binary edge map in three fixed passes:
//!
//! 1. 3x3 Sobel convolution with border clamping, L1 magnitude (`|gx| + |gy|`).
//! 2. Direction-quantized non-maximum suppression: a pixel survives only if
//!    its magnitude beats both neighbors along the quantized gradient
//!    direction. The outermost 1-pixel frame is skipped so neighbor lookup
//!    never leaves the image.
//! 3. Double-threshold hysteresis: survivors at or above `high_threshold` seed
//!    an 8-connected flood through survivors at or above `low_threshold`.
//!
//! Complexity: O(W*H) per pass. Images narrower or shorter than 3 pixels
//! produce an empty edge map.

use crate::frame::LumaImage;

/// Fixed thresholds for the gradient filter.
#[derive(Clone, Copy, Debug)]
pub struct EdgeParams {
    /// Weak-edge threshold on the L1 gradient magnitude.
    pub low_threshold: f32,
    /// Strong-edge threshold; seeds hysteresis.
    pub high_threshold: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

/// Binary edge map: marked pixels sit on a sharp intensity gradient.
#[derive(Clone, Debug)]
pub struct EdgeMap {
    pub w: usize,
    pub h: usize,
    data: Vec<bool>,
}

impl EdgeMap {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![false; w * h],
        }
    }

    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x]
    }

    pub fn set_edge(&mut self, x: usize, y: usize) {
        self.data[y * self.w + x] = true;
    }

    pub(crate) fn clear_edge(&mut self, x: usize, y: usize) {
        self.data[y * self.w + x] = false;
    }

    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|&&e| e).count()
    }

    /// Coordinates of every marked pixel, row-major order.
    pub fn edge_points(&self) -> Vec<(i32, i32)> {
        let mut points = Vec::new();
        for y in 0..self.h {
            for x in 0..self.w {
                if self.data[y * self.w + x] {
                    points.push((x as i32, y as i32));
                }
            }
        }
        points
    }
}

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

// tan(22.5 deg), the boundary between horizontal/vertical and diagonal bins.
const TAN_22_5_DEG: f32 = 0.41421356237;

struct Gradients {
    gx: LumaImage,
    gy: LumaImage,
    /// L1 magnitude per pixel: |gx| + |gy|.
    mag: LumaImage,
}

fn sobel_gradients(l: &LumaImage) -> Gradients {
    let w = l.w;
    let h = l.h;
    let mut gx = LumaImage::new(w, h);
    let mut gy = LumaImage::new(w, h);
    let mut mag = LumaImage::new(w, h);

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                let kx_row = &SOBEL_KERNEL_X[ky];
                let ky_row = &SOBEL_KERNEL_Y[ky];
                sum_x += row[x_idx[0]] * kx_row[0]
                    + row[x_idx[1]] * kx_row[1]
                    + row[x_idx[2]] * kx_row[2];
                sum_y += row[x_idx[0]] * ky_row[0]
                    + row[x_idx[1]] * ky_row[1]
                    + row[x_idx[2]] * ky_row[2];
            }

            gx.set(x, y, sum_x);
            gy.set(x, y, sum_y);
            mag.set(x, y, sum_x.abs() + sum_y.abs());
        }
    }

    Gradients { gx, gy, mag }
}

/// Detect edges with the fixed-threshold gradient filter.
pub fn detect_edges(luma: &LumaImage, params: &EdgeParams) -> EdgeMap {
    let w = luma.w;
    let h = luma.h;
    let mut edges = EdgeMap::new(w, h);
    if w < 3 || h < 3 {
        return edges;
    }

    let grad = sobel_gradients(luma);

    // NMS survivors, split into weak (>= low) and strong (>= high).
    // 0 = suppressed, 1 = weak, 2 = strong.
    let mut survivors = vec![0u8; w * h];
    let mut strong: Vec<(usize, usize)> = Vec::new();

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag < params.low_threshold {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            let (neighbor1, neighbor2) = if abs_gx >= abs_gy {
                if abs_gy <= abs_gx * TAN_22_5_DEG {
                    (mag_row[x - 1], mag_row[x + 1])
                } else if same_sign {
                    // Gradient points down-right (or up-left): the across-edge
                    // neighbors sit on the other diagonal.
                    (mag_prev[x - 1], mag_next[x + 1])
                } else {
                    (mag_prev[x + 1], mag_next[x - 1])
                }
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            // Strict on one side, non-strict on the other, so exactly one of
            // two equal-magnitude neighbors along a clean step survives.
            if !(mag > neighbor1 && mag >= neighbor2) {
                continue;
            }

            let idx = y * w + x;
            if mag >= params.high_threshold {
                survivors[idx] = 2;
                strong.push((x, y));
            } else {
                survivors[idx] = 1;
            }
        }
    }

    // Hysteresis: flood from strong pixels through weak survivors.
    let mut stack = strong;
    while let Some((x, y)) = stack.pop() {
        if edges.is_edge(x, y) {
            continue;
        }
        edges.set_edge(x, y);
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 1 || ny < 1 || nx >= w as i32 - 1 || ny >= h as i32 - 1 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if survivors[ny * w + nx] != 0 && !edges.is_edge(nx, ny) {
                    stack.push((nx, ny));
                }
            }
        }
    }

    edges
}
