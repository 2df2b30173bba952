//! FrameSource / Detector traits - visual feedback collaborators
//!
//! The core consumes camera frames and shape detections but implements
//! neither; real camera and detector backends and their mocks all hang off
//! these two traits.

use crate::{Detection, RawFrame, RigError, Roi};

/// A source of raw camera frames.
///
/// `capture` blocks until a frame is available or the device reports a
/// fault. Capture failures are recoverable: the stability gate treats them
/// as one failed attempt, never as a fatal error.
pub trait FrameSource: Send {
    /// Acquire the next frame
    fn capture(&mut self) -> Result<RawFrame, RigError>;
}

/// A shape detector run over a restricted search region.
///
/// Returns all candidate detections found inside `roi`, in region-relative
/// coordinates. An empty list is a normal outcome (nothing in view); an
/// `Err` means the detector itself failed, which callers treat the same as
/// an empty result.
pub trait Detector: Send + Sync {
    /// Detect candidate shapes within `roi` of `frame`
    fn detect(&self, frame: &RawFrame, roi: &Roi) -> Result<Vec<Detection>, RigError>;
}
