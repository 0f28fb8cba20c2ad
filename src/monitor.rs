//! The monitor loop.
//!
//! Drives the fixed per-frame sequence: read a frame, derive the edge map,
//! extract line segments, classify, report, throttle. The loop runs until the
//! stop flag is raised or the source signals end-of-stream; source errors
//! (camera failure) propagate out. Each iteration is independent: no frame,
//! edge map, or segment list survives past it.

use anyhow::Result;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::edges::{detect_edges, EdgeParams};
use crate::ingest::FrameSource;
use crate::lines::{detect_segments, LineParams};
use crate::posture::{classify, PostureLabel, DEFAULT_MAX_TILT_DEGREES};
use crate::report::Reporter;

const HEALTH_LOG_INTERVAL: Duration = Duration::from_secs(5);
/// Granularity of the stop-flag check while throttling.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Fixed parameters of one monitor run.
#[derive(Clone, Copy, Debug)]
pub struct MonitorParams {
    pub edge: EdgeParams,
    pub lines: LineParams,
    pub max_tilt_degrees: f32,
    /// Pause between iterations.
    pub interval: Duration,
}

impl Default for MonitorParams {
    fn default() -> Self {
        Self {
            edge: EdgeParams::default(),
            lines: LineParams::default(),
            max_tilt_degrees: DEFAULT_MAX_TILT_DEGREES,
            interval: Duration::from_millis(500),
        }
    }
}

/// Tallies for the shutdown log line and for tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub good: u64,
    pub corrections: u64,
}

pub struct Monitor<S: FrameSource, W: Write> {
    source: S,
    reporter: Reporter<W>,
    params: MonitorParams,
}

impl<S: FrameSource, W: Write> Monitor<S, W> {
    pub fn new(source: S, reporter: Reporter<W>, params: MonitorParams) -> Self {
        Self {
            source,
            reporter,
            params,
        }
    }

    /// Run until `stop` is raised or the source ends.
    ///
    /// End-of-stream is reported to the error stream and ends the run
    /// normally; a source error aborts it.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<RunSummary> {
        self.reporter.banner()?;

        let mut summary = RunSummary::default();
        let mut last_health_log = Instant::now();

        while !stop.load(Ordering::Relaxed) {
            let Some(frame) = self.source.next_frame()? else {
                log::error!("frame source ended; stopping");
                break;
            };

            let luma = frame.to_luma();
            let edges = detect_edges(&luma, &self.params.edge);
            let segments = detect_segments(&edges, &self.params.lines);
            let label = classify(&segments, self.params.max_tilt_degrees);
            self.reporter.report(label)?;

            summary.frames += 1;
            match label {
                PostureLabel::Good => summary.good += 1,
                PostureLabel::NeedsCorrection => summary.corrections += 1,
            }
            log::debug!(
                "frame #{}: {} edge px, {} segment(s), {:?}",
                summary.frames,
                edges.edge_count(),
                segments.len(),
                label
            );

            if last_health_log.elapsed() >= HEALTH_LOG_INTERVAL {
                let stats = self.source.stats();
                log::info!(
                    "source health={} frames={} origin={}",
                    self.source.is_healthy(),
                    stats.frames_produced,
                    stats.origin
                );
                last_health_log = Instant::now();
            }

            self.throttle(stop);
        }

        Ok(summary)
    }

    /// Give the reporter's sink back, for tests that inspect the output.
    pub fn into_sink(self) -> W {
        self.reporter.into_inner()
    }

    /// Sleep for the configured interval, waking early if `stop` is raised.
    fn throttle(&self, stop: &AtomicBool) {
        let deadline = Instant::now() + self.params.interval;
        while !stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}
