//! # Contracts
//!
//! Frozen interface contracts for the feeder rig: data structures and traits
//! shared by every crate in the workspace. All business crates depend only on
//! this crate, reverse dependencies are prohibited.
//!
//! ## Coordinate Model
//! - Pixel coordinates are `f64`, origin top-left of the full camera frame
//! - Detections returned by a [`Detector`] are relative to the search region
//!   they were found in; [`Detection::to_absolute`] lifts them to full-frame
//! - Physical positions are millimeters, derived via [`PixelScale`]

mod blueprint;
mod error;
mod frame;
mod geometry;
mod measurement;
mod runtime;
mod sink;
mod source;

pub use blueprint::*;
pub use error::*;
pub use frame::*;
pub use geometry::*;
pub use measurement::*;
pub use runtime::*;
pub use sink::*;
pub use source::*;
