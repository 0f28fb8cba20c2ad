//! upright - webcam posture monitor.
//!
//! Captures frames from a webcam, runs a fixed edge-detection and
//! line-detection filter chain, and reports a binary "Good posture!" /
//! "Straighten up!" classification every half second, based on the angle of
//! the first detected line segment.
//!
//! # Module Structure
//!
//! - `frame`: transient frame containers (Frame, LumaImage)
//! - `ingest`: frame sources (V4L2 devices, still images, scripted)
//! - `edges`: Sobel + NMS + hysteresis edge filter
//! - `lines`: probabilistic Hough line-segment extractor
//! - `posture`: the first-segment tilt classifier
//! - `report`: classification output
//! - `monitor`: the run-until-cancelled loop
//! - `config`: daemon configuration (JSON file + env overrides)
//!
//! Each iteration is independent and stateless: one frame is captured, judged,
//! reported, and discarded. The classifier consults only the first detected
//! segment; there is no candidate ranking and no smoothing across frames.

pub mod config;
pub mod edges;
pub mod frame;
pub mod ingest;
pub mod lines;
pub mod monitor;
pub mod posture;
pub mod report;

pub use config::{FilterSettings, SourceSettings, UprightdConfig};
pub use edges::{detect_edges, EdgeMap, EdgeParams};
pub use frame::{Frame, LumaImage};
pub use ingest::{FrameSource, ScriptedSource, SourceStats, V4l2Config, V4l2Source};
#[cfg(feature = "ingest-stills")]
pub use ingest::{StillsConfig, StillsSource};
pub use lines::{detect_segments, LineParams, LineSegment};
pub use monitor::{Monitor, MonitorParams, RunSummary};
pub use posture::{classify, PostureLabel, DEFAULT_MAX_TILT_DEGREES};
pub use report::{Reporter, BANNER, CORRECTION_MESSAGE, GOOD_MESSAGE};
