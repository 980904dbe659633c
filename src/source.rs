use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;

use anyhow::Context;

use crate::models::Frame;

/// Supplier of per-frame hand detections (camera + keypoint detector).
///
/// Handles are owned by whoever drives the frame loop and have an explicit
/// lifecycle: no frames are produced before `start` or after `stop`.
pub trait LandmarkSource {
    fn start(&mut self) -> anyhow::Result<()>;
    /// Wait for the next frame. `None` when the source is stopped or
    /// exhausted.
    fn next_frame(&mut self) -> impl Future<Output = Option<Frame>> + Send;
    fn stop(&mut self);
}

/// Replays recorded frames in order.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    frames: VecDeque<Frame>,
    running: bool,
}

impl ReplaySource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            running: false,
        }
    }

    /// Parse a JSON array of frames, each an array of hands, each an array of
    /// `{x, y, z}` points.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let frames: Vec<Frame> =
            serde_json::from_str(json).context("Failed to parse recorded frames")?;
        Ok(Self::new(frames))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read frames file {:?}", path))?;
        Self::from_json(&json)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ReplaySource {
    fn start(&mut self) -> anyhow::Result<()> {
        tracing::debug!("Replay source started with {} frames", self.frames.len());
        self.running = true;
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<Frame> {
        if !self.running {
            return None;
        }
        self.frames.pop_front()
    }

    fn stop(&mut self) {
        if self.running {
            tracing::debug!("Replay source stopped with {} frames left", self.frames.len());
        }
        self.running = false;
    }
}
