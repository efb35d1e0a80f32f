//! In-memory frame store.

use std::ops::Range;

use frame_common::Frame;

use super::{clamp_range, FrameStore};
use crate::error::Result;

/// Frame store backed by a `Vec<Frame>`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFrameStore {
    frames: Vec<Frame>,
}

impl MemoryFrameStore {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }
}

impl FrameStore for MemoryFrameStore {
    fn frame_count(&self) -> Result<usize> {
        Ok(self.frames.len())
    }

    fn read_frames(&self, range: Range<usize>) -> Result<Vec<Frame>> {
        let range = clamp_range(range, self.frames.len());
        Ok(self.frames[range].to_vec())
    }

    fn describe(&self) -> String {
        format!("memory:{} frames", self.frames.len())
    }
}
