//! RawFrame - Frame Source output
//!
//! Opaque pixel buffer handed from a camera (or mock) to the detector.

use bytes::Bytes;

/// A raw captured frame.
///
/// The core never interprets the pixel data itself; it only needs the
/// dimensions to clamp search regions. `data` is zero-copy shareable.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,

    /// Raw pixel data (format is a detector concern)
    pub data: Bytes,
}

impl RawFrame {
    /// Create a frame from dimensions and a pixel buffer
    pub fn new(width: u32, height: u32, data: Bytes) -> Self {
        Self {
            width,
            height,
            data,
        }
    }
}
