//! Scripted in-memory frame source.
//!
//! Serves a pre-built frame list in order, then signals end-of-stream. This is
//! the hook integration tests use to drive the whole pipeline without camera
//! hardware.

use anyhow::Result;
use std::collections::VecDeque;

use super::{FrameSource, SourceStats};
use crate::frame::Frame;

pub struct ScriptedSource {
    frames: VecDeque<Frame>,
    served: u64,
}

impl ScriptedSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            served: 0,
        }
    }
}

impl FrameSource for ScriptedSource {
    fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let frame = self.frames.pop_front();
        if frame.is_some() {
            self.served += 1;
        }
        Ok(frame)
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_produced: self.served,
            origin: "scripted".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::synthetic::flat_frame;

    #[test]
    fn serves_frames_in_order_then_ends() {
        let mut source =
            ScriptedSource::new(vec![flat_frame(8, 8, 10), flat_frame(8, 8, 20)]);
        source.connect().unwrap();

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.rgb()[0], 10);
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.rgb()[0], 20);

        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.stats().frames_produced, 2);
    }
}
