//! Mock camera.
//!
//! Implements `FrameSource`, handing out flat gray frames. The pixel
//! content is irrelevant to the pipeline since detection is also mocked;
//! the frames only carry realistic dimensions.

use bytes::Bytes;
use contracts::{FrameSource, RawFrame, RigError};
use tracing::trace;

/// Mock camera configuration
#[derive(Debug, Clone)]
pub struct MockCameraConfig {
    /// Frame width (pixels)
    pub width: u32,
    /// Frame height (pixels)
    pub height: u32,
    /// 1-based capture numbers that fail
    pub fail_on_captures: Vec<u64>,
}

impl Default for MockCameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fail_on_captures: Vec::new(),
        }
    }
}

/// Frame source backed by synthetic frames
pub struct MockCamera {
    config: MockCameraConfig,
    fill: Bytes,
    captures: u64,
}

impl MockCamera {
    pub fn new(config: MockCameraConfig) -> Self {
        let size = (config.width * config.height) as usize;
        Self {
            fill: Bytes::from(vec![128u8; size]),
            config,
            captures: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(MockCameraConfig::default())
    }

    /// Frames handed out so far
    pub fn captures(&self) -> u64 {
        self.captures
    }
}

impl FrameSource for MockCamera {
    fn capture(&mut self) -> Result<RawFrame, RigError> {
        self.captures += 1;
        if self.config.fail_on_captures.contains(&self.captures) {
            return Err(RigError::capture("mock camera scripted failure"));
        }

        trace!(capture = self.captures, "mock frame");
        Ok(RawFrame {
            width: self.config.width,
            height: self.config.height,
            data: self.fill.clone(),
        })
    }
}
