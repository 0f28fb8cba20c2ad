//! Classification reporter.
//!
//! Writes the startup banner and one line per judged frame to a byte sink.
//! These lines are the program's output proper; diagnostics go through `log`
//! to stderr instead. The sink is flushed after every line so the feed is
//! observable at the throttled frame rate.

use anyhow::{Context, Result};
use std::io::Write;

use crate::posture::PostureLabel;

pub const BANNER: &str = "Posture monitor running. Press Ctrl-C to quit.";
pub const GOOD_MESSAGE: &str = "Good posture!";
pub const CORRECTION_MESSAGE: &str = "Straighten up!";

pub struct Reporter<W: Write> {
    sink: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn banner(&mut self) -> Result<()> {
        writeln!(self.sink, "{}", BANNER).context("write banner")?;
        self.sink.flush().context("flush banner")
    }

    pub fn report(&mut self, label: PostureLabel) -> Result<()> {
        let line = match label {
            PostureLabel::Good => GOOD_MESSAGE,
            PostureLabel::NeedsCorrection => CORRECTION_MESSAGE,
        };
        writeln!(self.sink, "{}", line).context("write classification")?;
        self.sink.flush().context("flush classification")
    }

    /// Hand the sink back, for tests that inspect the written bytes.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
