//! Frame ingestion sources.
//!
//! This module provides the sources a monitor can read frames from:
//! - USB/V4L2 devices (real capture behind the `ingest-v4l2` feature;
//!   `stub://` paths select a synthetic scene)
//! - Local still images (feature: `ingest-stills`)
//! - Scripted in-memory sources (tests and demos)
//!
//! All sources produce `Frame` instances that flow straight into the filter
//! chain. A source is a lazy, in principle infinite, non-restartable sequence
//! of frames; `Ok(None)` from `next_frame` signals end-of-stream and ends the
//! monitor loop normally. Errors are reserved for capture failures, which the
//! monitor treats as fatal.

pub mod scripted;
#[cfg(feature = "ingest-stills")]
pub mod stills;
pub mod synthetic;
pub mod v4l2;

pub use scripted::ScriptedSource;
#[cfg(feature = "ingest-stills")]
pub use stills::{StillsConfig, StillsSource};
pub use v4l2::{V4l2Config, V4l2Source};

use anyhow::Result;

use crate::frame::Frame;

/// Capability interface over a frame producer.
///
/// The filter chain and classifier only ever see `Frame`s, so any
/// implementation of this trait (including a purely synthetic one) exercises
/// the whole pipeline.
pub trait FrameSource {
    /// Open the underlying device or data set. Failure here is fatal to the
    /// daemon (there is no retry; transient and permanent failures are not
    /// distinguished).
    fn connect(&mut self) -> Result<()>;

    /// Produce the next frame, blocking until one is available.
    /// `Ok(None)` signals end-of-stream.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Whether the source believes it can keep producing frames.
    fn is_healthy(&self) -> bool;

    /// Counters for the periodic health log line.
    fn stats(&self) -> SourceStats;
}

/// Statistics for a frame source.
#[derive(Clone, Debug)]
pub struct SourceStats {
    pub frames_produced: u64,
    /// Human-readable origin (device path, directory, "scripted").
    pub origin: String,
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn connect(&mut self) -> Result<()> {
        (**self).connect()
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        (**self).next_frame()
    }

    fn is_healthy(&self) -> bool {
        (**self).is_healthy()
    }

    fn stats(&self) -> SourceStats {
        (**self).stats()
    }
}
