//! Transient frame containers.
//!
//! Every loop iteration captures one `Frame`, derives a luminance image and an
//! edge map from it, and drops everything at end of scope. Nothing here
//! survives across iterations and nothing carries an identifier.

use anyhow::{anyhow, Result};

/// One captured frame: packed RGB24 samples plus dimensions.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Packed RGB24 pixel data, row-major, 3 bytes per pixel.
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Wrap packed RGB24 bytes. Fails when the byte count does not match the
    /// dimensions.
    pub fn from_rgb(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(anyhow!(
                "frame byte count {} does not match {}x{} RGB24 ({} expected)",
                data.len(),
                width,
                height,
                expected
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn rgb(&self) -> &[u8] {
        &self.data
    }

    /// Convert to a single-channel luminance image (Rec.601 weights).
    ///
    /// The filter chain works entirely on this representation; the color frame
    /// is not consulted again.
    pub fn to_luma(&self) -> LumaImage {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut luma = LumaImage::new(w, h);
        for (px, out) in self.data.chunks_exact(3).zip(luma.data.iter_mut()) {
            *out = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
        }
        luma
    }
}

/// Single-channel f32 image buffer with row accessors.
#[derive(Clone, Debug)]
pub struct LumaImage {
    pub w: usize,
    pub h: usize,
    data: Vec<f32>,
}

impl LumaImage {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0.0; w * h],
        }
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.w..(y + 1) * self.w]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        &mut self.data[y * self.w..(y + 1) * self.w]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.w + x] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_rejects_wrong_byte_count() {
        assert!(Frame::from_rgb(vec![0u8; 10], 4, 4).is_err());
    }

    #[test]
    fn luma_conversion_uses_rec601_weights() {
        // One white pixel, one pure green pixel.
        let data = vec![255, 255, 255, 0, 255, 0];
        let frame = Frame::from_rgb(data, 2, 1).unwrap();
        let luma = frame.to_luma();

        assert!((luma.get(0, 0) - 255.0).abs() < 0.5);
        assert!((luma.get(1, 0) - 0.587 * 255.0).abs() < 0.5);
    }

    #[test]
    fn luma_rows_are_addressable() {
        let frame = Frame::from_rgb(vec![100u8; 4 * 3 * 3], 4, 3).unwrap();
        let luma = frame.to_luma();

        assert_eq!(luma.row(0).len(), 4);
        assert_eq!(luma.row(2).len(), 4);
    }
}
