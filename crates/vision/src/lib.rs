//! # Vision
//!
//! Detection-side logic of the measurement rig: the region tracker that
//! keeps a shrinking region of interest locked onto the part, and the
//! stability gate that only accepts a position once two consecutive
//! frames agree on it.
//!
//! Frame acquisition and circle detection themselves live behind the
//! [`contracts::FrameSource`] and [`contracts::Detector`] traits; this
//! crate consumes them.

mod error;
mod stability;
mod tracker;

pub use error::VisionError;
pub use stability::{acquire_stable, GateConfig, StableReading};
pub use tracker::{RegionTracker, TrackerConfig};
