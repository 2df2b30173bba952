//! # Rig
//!
//! Simulated hardware for the measurement rig: a scripted serial link, a
//! synthetic camera, and canned detectors. Used by `run --mock` for
//! development without the bench, and by the integration tests to drive
//! full sweeps deterministically.

mod mock_camera;
mod mock_detector;
mod mock_link;

pub use mock_camera::{MockCamera, MockCameraConfig};
pub use mock_detector::{MockDetector, ScriptedDetector};
pub use mock_link::{LinkStats, MockLink, MockLinkConfig};
