//! Daemon configuration.
//!
//! `uprightd` runs with built-in defaults that match the fixed filter chain
//! (device /dev/video0, 500 ms interval, Sobel thresholds 50/150, Hough
//! 100/50/10, 10 degree tilt). An optional JSON file named by `UPRIGHT_CONFIG`
//! overrides them, and a few environment variables override the file.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::edges::EdgeParams;
use crate::lines::LineParams;
use crate::monitor::MonitorParams;
use crate::posture::DEFAULT_MAX_TILT_DEGREES;

const DEFAULT_DEVICE: &str = "/dev/video0";
const DEFAULT_TARGET_FPS: u32 = 0;
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const DEFAULT_INTERVAL_MS: u64 = 500;

#[derive(Debug, Deserialize, Default)]
struct UprightdConfigFile {
    source: Option<SourceConfigFile>,
    filter: Option<FilterConfigFile>,
    posture: Option<PostureConfigFile>,
    interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    device: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct FilterConfigFile {
    edge_low: Option<f32>,
    edge_high: Option<f32>,
    votes_threshold: Option<i32>,
    min_line_length: Option<i32>,
    max_line_gap: Option<i32>,
}

#[derive(Debug, Deserialize, Default)]
struct PostureConfigFile {
    max_tilt_degrees: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct UprightdConfig {
    pub source: SourceSettings,
    pub filter: FilterSettings,
    pub max_tilt_degrees: f32,
    pub interval: Duration,
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub device: String,
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct FilterSettings {
    pub edge_low: f32,
    pub edge_high: f32,
    pub votes_threshold: i32,
    pub min_line_length: i32,
    pub max_line_gap: i32,
}

impl UprightdConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("UPRIGHT_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: UprightdConfigFile) -> Self {
        let edge_defaults = EdgeParams::default();
        let line_defaults = LineParams::default();

        let source = SourceSettings {
            device: file
                .source
                .as_ref()
                .and_then(|source| source.device.clone())
                .unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
            target_fps: file
                .source
                .as_ref()
                .and_then(|source| source.target_fps)
                .unwrap_or(DEFAULT_TARGET_FPS),
            width: file
                .source
                .as_ref()
                .and_then(|source| source.width)
                .unwrap_or(DEFAULT_WIDTH),
            height: file
                .source
                .as_ref()
                .and_then(|source| source.height)
                .unwrap_or(DEFAULT_HEIGHT),
        };
        let filter = FilterSettings {
            edge_low: file
                .filter
                .as_ref()
                .and_then(|filter| filter.edge_low)
                .unwrap_or(edge_defaults.low_threshold),
            edge_high: file
                .filter
                .as_ref()
                .and_then(|filter| filter.edge_high)
                .unwrap_or(edge_defaults.high_threshold),
            votes_threshold: file
                .filter
                .as_ref()
                .and_then(|filter| filter.votes_threshold)
                .unwrap_or(line_defaults.votes_threshold),
            min_line_length: file
                .filter
                .as_ref()
                .and_then(|filter| filter.min_line_length)
                .unwrap_or(line_defaults.min_length),
            max_line_gap: file
                .filter
                .and_then(|filter| filter.max_line_gap)
                .unwrap_or(line_defaults.max_gap),
        };
        let max_tilt_degrees = file
            .posture
            .and_then(|posture| posture.max_tilt_degrees)
            .unwrap_or(DEFAULT_MAX_TILT_DEGREES);
        let interval = Duration::from_millis(file.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS));

        Self {
            source,
            filter,
            max_tilt_degrees,
            interval,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(device) = std::env::var("UPRIGHT_DEVICE") {
            if !device.trim().is_empty() {
                self.source.device = device;
            }
        }
        if let Ok(interval) = std::env::var("UPRIGHT_INTERVAL_MS") {
            let millis: u64 = interval
                .parse()
                .map_err(|_| anyhow!("UPRIGHT_INTERVAL_MS must be an integer number of ms"))?;
            self.interval = Duration::from_millis(millis);
        }
        if let Ok(tilt) = std::env::var("UPRIGHT_MAX_TILT_DEG") {
            let degrees: f32 = tilt
                .parse()
                .map_err(|_| anyhow!("UPRIGHT_MAX_TILT_DEG must be a number of degrees"))?;
            self.max_tilt_degrees = degrees;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(anyhow!("interval_ms must be greater than zero"));
        }
        if self.filter.edge_low <= 0.0 || self.filter.edge_high <= self.filter.edge_low {
            return Err(anyhow!(
                "edge thresholds must satisfy 0 < edge_low < edge_high"
            ));
        }
        if self.filter.votes_threshold <= 0 {
            return Err(anyhow!("votes_threshold must be positive"));
        }
        if self.filter.min_line_length <= 0 {
            return Err(anyhow!("min_line_length must be positive"));
        }
        if self.filter.max_line_gap < 0 {
            return Err(anyhow!("max_line_gap must not be negative"));
        }
        if !(0.0..90.0).contains(&self.max_tilt_degrees) || self.max_tilt_degrees == 0.0 {
            return Err(anyhow!("max_tilt_degrees must lie in (0, 90)"));
        }
        Ok(())
    }

    /// Filter-chain parameters for `Monitor::run`.
    pub fn monitor_params(&self) -> MonitorParams {
        MonitorParams {
            edge: EdgeParams {
                low_threshold: self.filter.edge_low,
                high_threshold: self.filter.edge_high,
            },
            lines: LineParams {
                votes_threshold: self.filter.votes_threshold,
                min_length: self.filter.min_line_length,
                max_gap: self.filter.max_line_gap,
                ..LineParams::default()
            },
            max_tilt_degrees: self.max_tilt_degrees,
            interval: self.interval,
        }
    }
}

fn read_config_file(path: &Path) -> Result<UprightdConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
