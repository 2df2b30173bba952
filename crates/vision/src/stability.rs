//! Stability gate: accept a position only when two consecutive frames
//! agree on it.
//!
//! A single frame is not trusted: the part may still be settling after a
//! servo step, or the detector may have latched onto a glint. Each
//! attempt captures two frames back to back and compares the detected
//! x positions in millimetres; only a pair within tolerance produces a
//! reading.

use contracts::{Detection, Detector, FrameSource, PixelScale, PositionEstimate, Roi};
use metrics::counter;
use tracing::{debug, warn};

use crate::error::VisionError;
use crate::tracker::RegionTracker;

/// Stability gate tuning
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Two-frame attempts before giving up on this step
    pub max_attempts: u32,
    /// Largest frame-to-frame x disagreement still considered stable
    pub tolerance_mm: f64,
    /// Pixel-to-millimetre conversion
    pub scale: PixelScale,
}

/// A position the gate accepted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StableReading {
    /// Accepted position, from the first frame of the agreeing pair
    pub position: PositionEstimate,
    /// Two-frame attempts consumed, including the successful one
    pub attempts: u32,
}

/// Run the two-frame agreement protocol.
///
/// Every attempt drives the tracker: confirmed detections re-center its
/// region, frames with no detection count as tracker misses. Capture or
/// detector failures burn an attempt but leave the tracker alone, since
/// they say nothing about where the part is.
///
/// # Errors
/// [`VisionError::NoStableReading`] once the attempt budget is spent.
pub fn acquire_stable(
    source: &mut dyn FrameSource,
    detector: &dyn Detector,
    tracker: &mut RegionTracker,
    config: &GateConfig,
) -> Result<StableReading, VisionError> {
    for attempt in 1..=config.max_attempts {
        let first = match observe_once(source, detector, tracker) {
            Ok(Some(detection)) => detection,
            Ok(None) | Err(()) => continue,
        };

        let second = match observe_once(source, detector, tracker) {
            Ok(Some(detection)) => detection,
            Ok(None) | Err(()) => continue,
        };

        let delta_mm = (config.scale.to_mm(first.center_x) - config.scale.to_mm(second.center_x))
            .abs();
        if delta_mm <= config.tolerance_mm {
            return Ok(StableReading {
                position: PositionEstimate {
                    x_mm: config.scale.to_mm(first.center_x),
                    y_mm: config.scale.to_mm(first.center_y),
                },
                attempts: attempt,
            });
        }

        counter!("vision_unstable_pairs_total").increment(1);
        debug!(attempt, delta_mm, tolerance_mm = config.tolerance_mm, "frames disagree");
    }

    counter!("vision_gate_exhausted_total").increment(1);
    Err(VisionError::NoStableReading {
        attempts: config.max_attempts,
    })
}

/// Capture one frame and run detection over the tracker's region.
///
/// `Ok(Some(_))` is a confirmed detection in absolute coordinates (the
/// tracker has been re-centered on it). `Ok(None)` means the frame was
/// clean but empty (tracker missed). `Err(())` is a capture or detector
/// fault, already logged.
fn observe_once(
    source: &mut dyn FrameSource,
    detector: &dyn Detector,
    tracker: &mut RegionTracker,
) -> Result<Option<Detection>, ()> {
    let frame = match source.capture() {
        Ok(frame) => frame,
        Err(err) => {
            warn!(error = %err, "frame capture failed");
            return Err(());
        }
    };

    let roi = tracker.roi_for(frame.width, frame.height);
    let detections = match detector.detect(&frame, &roi) {
        Ok(detections) => detections,
        Err(err) => {
            warn!(error = %err, "detector failed");
            return Err(());
        }
    };

    match best_detection(&detections, &roi) {
        Some(detection) => {
            tracker.observe(&detection, frame.width, frame.height);
            Ok(Some(detection))
        }
        None => {
            tracker.miss();
            Ok(None)
        }
    }
}

/// Pick the candidate nearest the region center, in absolute coordinates
fn best_detection(detections: &[Detection], roi: &Roi) -> Option<Detection> {
    let (cx, cy) = roi.center();
    detections
        .iter()
        .map(|d| d.to_absolute(roi))
        .min_by(|a, b| {
            let da = (a.center_x - cx).powi(2) + (a.center_y - cy).powi(2);
            let db = (b.center_x - cx).powi(2) + (b.center_y - cy).powi(2);
            da.total_cmp(&db)
        })
}
