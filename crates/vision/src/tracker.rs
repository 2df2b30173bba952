//! Region tracker: keeps the detection window locked onto the part.
//!
//! The tracker starts unseeded, searching the full frame. Each confirmed
//! detection re-centers a square region of interest on the part, sized
//! from the detected radius. Consecutive misses grow a counter; once it
//! hits the limit the lock is dropped and the search goes back to the
//! full frame.

use contracts::{Detection, Roi, VisionConfig};
use metrics::counter;
use tracing::{debug, trace};

/// Tracker tuning, lifted out of the full vision config
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    /// ROI side length as a multiple of the detected diameter
    pub shrink_factor: f64,
    /// Smallest usable ROI side in pixels
    pub min_roi_side: u32,
    /// Consecutive misses tolerated before dropping the lock
    pub miss_limit: u32,
}

impl TrackerConfig {
    pub fn from_vision(config: &VisionConfig) -> Self {
        Self {
            shrink_factor: config.shrink_factor,
            min_roi_side: config.min_roi_side,
            miss_limit: config.miss_limit,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum TrackerState {
    /// No lock, search the whole frame
    Unseeded,
    /// Locked onto a region, counting consecutive misses
    Tracking { roi: Roi, misses: u32 },
}

/// Tracks the region of interest across captures
#[derive(Debug)]
pub struct RegionTracker {
    config: TrackerConfig,
    state: TrackerState,
}

impl RegionTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            state: TrackerState::Unseeded,
        }
    }

    /// The region the next detection pass should search
    pub fn roi_for(&self, frame_width: u32, frame_height: u32) -> Roi {
        match self.state {
            TrackerState::Unseeded => Roi::full_frame(frame_width, frame_height),
            TrackerState::Tracking { roi, .. } => roi,
        }
    }

    /// Whether the tracker currently holds a lock
    pub fn is_tracking(&self) -> bool {
        matches!(self.state, TrackerState::Tracking { .. })
    }

    /// Feed a confirmed detection in absolute frame coordinates.
    ///
    /// Re-centers the ROI on the detection and resets the miss counter.
    /// A detection whose ROI, after clamping to the frame, falls below
    /// the minimum side is too small to trust and counts as a miss
    /// instead.
    pub fn observe(&mut self, detection: &Detection, frame_width: u32, frame_height: u32) {
        let side = (self.config.shrink_factor * 2.0 * detection.radius).round() as u32;
        let roi = Roi::centered(
            detection.center_x,
            detection.center_y,
            side,
            frame_width,
            frame_height,
        );
        if roi.width.min(roi.height) < self.config.min_roi_side {
            debug!(
                width = roi.width,
                height = roi.height,
                min = self.config.min_roi_side,
                "clamped region too small for a lock"
            );
            self.miss();
            return;
        }
        trace!(?roi, "tracker re-centered");
        self.state = TrackerState::Tracking { roi, misses: 0 };
    }

    /// Register a detection miss; drops the lock at the limit
    pub fn miss(&mut self) {
        if let TrackerState::Tracking { roi, misses } = self.state {
            let misses = misses + 1;
            if misses >= self.config.miss_limit {
                counter!("vision_tracker_lock_drops_total").increment(1);
                debug!(misses, "miss limit reached, back to full-frame search");
                self.state = TrackerState::Unseeded;
            } else {
                self.state = TrackerState::Tracking { roi, misses };
            }
        }
    }

    /// Forget the current lock
    pub fn reset(&mut self) {
        self.state = TrackerState::Unseeded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrackerConfig {
        TrackerConfig {
            shrink_factor: 2.0,
            min_roi_side: 24,
            miss_limit: 3,
        }
    }

    fn detection(x: f64, y: f64, radius: f64) -> Detection {
        Detection {
            center_x: x,
            center_y: y,
            radius,
        }
    }

    #[test]
    fn test_unseeded_searches_full_frame() {
        let tracker = RegionTracker::new(config());
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.roi_for(640, 480), Roi::full_frame(640, 480));
    }

    #[test]
    fn test_observe_centers_roi_sized_from_radius() {
        let mut tracker = RegionTracker::new(config());
        tracker.observe(&detection(320.0, 240.0, 37.0), 640, 480);

        assert!(tracker.is_tracking());
        let roi = tracker.roi_for(640, 480);
        // side = round(2.0 * 2 * 37) = 148, centered on (320, 240)
        assert_eq!(roi.width, 148);
        assert_eq!(roi.height, 148);
        assert_eq!(roi.x_start, 246);
        assert_eq!(roi.y_start, 166);
    }

    #[test]
    fn test_roi_clamped_to_frame_near_edge() {
        let mut tracker = RegionTracker::new(config());
        tracker.observe(&detection(10.0, 10.0, 30.0), 640, 480);

        let roi = tracker.roi_for(640, 480);
        assert_eq!(roi.x_start, 0);
        assert_eq!(roi.y_start, 0);
        assert!(roi.width <= 640 && roi.height <= 480);
    }

    #[test]
    fn test_tiny_detection_counts_as_miss() {
        let mut tracker = RegionTracker::new(config());
        tracker.observe(&detection(320.0, 240.0, 37.0), 640, 480);

        // radius 5 implies side 20, below the 24 px minimum
        tracker.observe(&detection(320.0, 240.0, 5.0), 640, 480);
        assert!(tracker.is_tracking());

        tracker.observe(&detection(320.0, 240.0, 5.0), 640, 480);
        tracker.observe(&detection(320.0, 240.0, 5.0), 640, 480);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_clamped_roi_below_minimum_counts_as_miss() {
        let mut tracker = RegionTracker::new(config());

        // radius 6 implies side 24, but centered at x = 639 on a 640 px
        // frame the clamped width is only 13
        tracker.observe(&detection(639.0, 240.0, 6.0), 640, 480);
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.roi_for(640, 480), Roi::full_frame(640, 480));

        // the same miss accounting applies while locked
        tracker.observe(&detection(320.0, 240.0, 37.0), 640, 480);
        tracker.observe(&detection(639.0, 240.0, 6.0), 640, 480);
        tracker.observe(&detection(639.0, 240.0, 6.0), 640, 480);
        assert!(tracker.is_tracking());
        tracker.observe(&detection(639.0, 240.0, 6.0), 640, 480);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_lock_survives_misses_below_limit() {
        let mut tracker = RegionTracker::new(config());
        tracker.observe(&detection(320.0, 240.0, 37.0), 640, 480);
        let locked = tracker.roi_for(640, 480);

        tracker.miss();
        tracker.miss();
        assert!(tracker.is_tracking());
        assert_eq!(tracker.roi_for(640, 480), locked);

        tracker.miss();
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.roi_for(640, 480), Roi::full_frame(640, 480));
    }

    #[test]
    fn test_hit_resets_miss_counter() {
        let mut tracker = RegionTracker::new(config());
        tracker.observe(&detection(320.0, 240.0, 37.0), 640, 480);
        tracker.miss();
        tracker.miss();
        tracker.observe(&detection(322.0, 241.0, 37.0), 640, 480);

        // counter restarted, two more misses keep the lock
        tracker.miss();
        tracker.miss();
        assert!(tracker.is_tracking());
    }

    #[test]
    fn test_miss_while_unseeded_is_a_no_op() {
        let mut tracker = RegionTracker::new(config());
        tracker.miss();
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_reset_drops_lock() {
        let mut tracker = RegionTracker::new(config());
        tracker.observe(&detection(320.0, 240.0, 37.0), 640, 480);
        tracker.reset();
        assert!(!tracker.is_tracking());
    }
}
