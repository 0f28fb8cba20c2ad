//! uprightd - posture monitor daemon
//!
//! This daemon:
//! 1. Loads configuration (defaults, optional JSON file, env overrides)
//! 2. Opens the configured frame source (fails fast if the camera is gone)
//! 3. Runs the fixed filter chain and classifier on every frame
//! 4. Prints one classification line per frame to stdout
//! 5. Stops on Ctrl-C or when the source ends

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use upright::{FrameSource, Monitor, Reporter, UprightdConfig, V4l2Config, V4l2Source};

fn main() -> Result<()> {
    // Initialize logging (simple stderr)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = UprightdConfig::load()?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            stop.store(true, Ordering::Relaxed);
        })
        .context("install Ctrl-C handler")?;
    }

    log::info!("uprightd {} starting", env!("CARGO_PKG_VERSION"));
    log::info!(
        "device={} interval={}ms max_tilt={}deg",
        cfg.source.device,
        cfg.interval.as_millis(),
        cfg.max_tilt_degrees
    );

    let mut source = build_source(&cfg)?;
    source.connect()?;

    let reporter = Reporter::new(std::io::stdout());
    let mut monitor = Monitor::new(source, reporter, cfg.monitor_params());
    let summary = monitor.run(&stop)?;

    log::info!(
        "uprightd stopped: {} frame(s) judged ({} good, {} corrections)",
        summary.frames,
        summary.good,
        summary.corrections
    );
    Ok(())
}

fn build_source(cfg: &UprightdConfig) -> Result<Box<dyn FrameSource>> {
    if let Some(path) = cfg.source.device.strip_prefix("stills://") {
        #[cfg(feature = "ingest-stills")]
        {
            let source = upright::StillsSource::new(upright::StillsConfig {
                path: std::path::PathBuf::from(path),
            });
            return Ok(Box::new(source));
        }
        #[cfg(not(feature = "ingest-stills"))]
        {
            anyhow::bail!(
                "still-image ingestion requires the ingest-stills feature (got stills://{})",
                path
            );
        }
    }

    let source = V4l2Source::new(V4l2Config {
        device: cfg.source.device.clone(),
        target_fps: cfg.source.target_fps,
        width: cfg.source.width,
        height: cfg.source.height,
    })?;
    Ok(Box::new(source))
}
