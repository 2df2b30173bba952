//! Position estimates and measurement records.

use serde::{Deserialize, Serialize};

use crate::RigError;

/// Pixel-to-millimeter conversion derived from a feature of known size.
///
/// The rig places a reference circle of known physical diameter in view;
/// its apparent diameter in pixels fixes the scale for the whole sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelScale {
    mm_per_px: f64,
}

impl PixelScale {
    /// Build a scale from a reference feature
    ///
    /// # Errors
    /// Rejects non-positive diameters.
    pub fn from_reference(diameter_mm: f64, diameter_px: f64) -> Result<Self, RigError> {
        if diameter_mm <= 0.0 || diameter_px <= 0.0 {
            return Err(RigError::config_validation(
                "vision.reference_diameter",
                format!(
                    "reference diameters must be > 0, got {diameter_mm} mm / {diameter_px} px"
                ),
            ));
        }
        Ok(Self {
            mm_per_px: diameter_mm / diameter_px,
        })
    }

    /// Convert a pixel distance to millimeters
    pub fn to_mm(&self, px: f64) -> f64 {
        px * self.mm_per_px
    }

    /// Millimeters per pixel
    pub fn mm_per_px(&self) -> f64 {
        self.mm_per_px
    }
}

/// Physical position of a detection center, in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionEstimate {
    /// Position along the travel axis
    pub x_mm: f64,

    /// Position across the travel axis
    pub y_mm: f64,
}

/// The accepted output of one stability-gate cycle.
///
/// Appended to an ordered, append-only sequence for the whole sweep and
/// never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Accepted position estimate
    pub position: PositionEstimate,

    /// The commanded servo position this measurement belongs to
    pub commanded_index: u16,

    /// Stability-gate attempts consumed before acceptance
    pub attempts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_from_reference() {
        // The rig's reference circle: 1.4 mm across, 72 px apparent
        let scale = PixelScale::from_reference(1.4, 72.0).unwrap();
        assert!((scale.to_mm(72.0) - 1.4).abs() < 1e-12);
        assert!((scale.to_mm(36.0) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_scale_rejects_zero() {
        assert!(PixelScale::from_reference(0.0, 72.0).is_err());
        assert!(PixelScale::from_reference(1.4, 0.0).is_err());
        assert!(PixelScale::from_reference(-1.4, 72.0).is_err());
    }

    #[test]
    fn test_record_serializes() {
        let record = MeasurementRecord {
            position: PositionEstimate {
                x_mm: 1.944,
                y_mm: 1.944,
            },
            commanded_index: 900,
            attempts: 1,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"commanded_index\":900"));
    }
}
