//! Mock detectors.
//!
//! [`MockDetector`] always sees the same circle at a fixed full-frame
//! position, which is enough to drive a whole sweep. [`ScriptedDetector`]
//! pops one canned detection list per frame for scenarios that need the
//! part to move, vanish, or flicker.

use std::collections::VecDeque;
use std::sync::Mutex;

use contracts::{Detection, Detector, RawFrame, RigError, Roi};

/// Detector that reports one circle at a fixed full-frame position
#[derive(Debug, Clone, Copy)]
pub struct MockDetector {
    center_x: f64,
    center_y: f64,
    radius: f64,
}

impl MockDetector {
    pub fn fixed(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }
}

impl Detector for MockDetector {
    fn detect(&self, _frame: &RawFrame, roi: &Roi) -> Result<Vec<Detection>, RigError> {
        if !roi.contains(self.center_x, self.center_y) {
            return Ok(Vec::new());
        }
        Ok(vec![Detection {
            center_x: self.center_x - f64::from(roi.x_start),
            center_y: self.center_y - f64::from(roi.y_start),
            radius: self.radius,
        }])
    }
}

/// Detector driven by a per-frame script of full-frame detections.
///
/// Each `detect` call consumes one script entry; once the script runs
/// out, every frame comes back empty. Entries outside the search region
/// are filtered, matching what a real detector would see.
pub struct ScriptedDetector {
    script: Mutex<VecDeque<Vec<Detection>>>,
}

impl ScriptedDetector {
    pub fn new(frames: Vec<Vec<Detection>>) -> Self {
        Self {
            script: Mutex::new(frames.into()),
        }
    }

    /// Remaining scripted frames
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl Detector for ScriptedDetector {
    fn detect(&self, _frame: &RawFrame, roi: &Roi) -> Result<Vec<Detection>, RigError> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| RigError::detector("scripted detector lock poisoned"))?;
        let absolute = script.pop_front().unwrap_or_default();
        Ok(absolute
            .into_iter()
            .filter(|d| roi.contains(d.center_x, d.center_y))
            .map(|d| Detection {
                center_x: d.center_x - f64::from(roi.x_start),
                center_y: d.center_y - f64::from(roi.y_start),
                radius: d.radius,
            })
            .collect())
    }
}
