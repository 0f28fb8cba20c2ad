//! Still-image frame source.
//!
//! Serves decoded still images as frames: a single file, or every JPEG/PNG in
//! a directory in name order, one frame each, then end-of-stream. Useful for
//! judging posture on canned captures without a camera attached.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use super::{FrameSource, SourceStats};
use crate::frame::Frame;

/// Configuration for a still-image source.
#[derive(Clone, Debug)]
pub struct StillsConfig {
    /// An image file, or a directory of image files.
    pub path: PathBuf,
}

pub struct StillsSource {
    config: StillsConfig,
    /// Remaining files, reverse-sorted so `pop` yields name order.
    pending: Vec<PathBuf>,
    served: u64,
    connected: bool,
}

impl StillsSource {
    pub fn new(config: StillsConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
            served: 0,
            connected: false,
        }
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ext.eq_ignore_ascii_case("jpg")
                || ext.eq_ignore_ascii_case("jpeg")
                || ext.eq_ignore_ascii_case("png")
        })
}

impl FrameSource for StillsSource {
    fn connect(&mut self) -> Result<()> {
        let path = &self.config.path;
        let mut files = if path.is_dir() {
            std::fs::read_dir(path)
                .with_context(|| format!("read image directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| is_image_file(p))
                .collect::<Vec<_>>()
        } else if path.is_file() {
            vec![path.clone()]
        } else {
            return Err(anyhow!("no such file or directory: {}", path.display()));
        };

        if files.is_empty() {
            return Err(anyhow!("no images found under {}", path.display()));
        }

        files.sort();
        files.reverse();
        self.pending = files;
        self.connected = true;
        log::info!(
            "StillsSource: {} image(s) queued from {}",
            self.pending.len(),
            path.display()
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(file) = self.pending.pop() else {
            return Ok(None);
        };

        let decoded = image::open(&file)
            .with_context(|| format!("decode image {}", file.display()))?
            .to_rgb8();
        let (width, height) = decoded.dimensions();
        let frame = Frame::from_rgb(decoded.into_raw(), width, height)?;

        self.served += 1;
        Ok(Some(frame))
    }

    fn is_healthy(&self) -> bool {
        self.connected
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_produced: self.served,
            origin: self.config.path.display().to_string(),
        }
    }
}
