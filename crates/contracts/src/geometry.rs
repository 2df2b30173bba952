//! Region of interest and detection geometry.

use serde::{Deserialize, Serialize};

/// Rectangular region of interest over a frame's pixel space.
///
/// Invariant: always lies fully within the bounds of the frame it was built
/// against. Construct via [`Roi::full_frame`] or [`Roi::centered`], both of
/// which clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    /// Left edge (pixels)
    pub x_start: u32,

    /// Top edge (pixels)
    pub y_start: u32,

    /// Width (pixels)
    pub width: u32,

    /// Height (pixels)
    pub height: u32,
}

impl Roi {
    /// The whole frame
    pub fn full_frame(frame_width: u32, frame_height: u32) -> Self {
        Self {
            x_start: 0,
            y_start: 0,
            width: frame_width,
            height: frame_height,
        }
    }

    /// Square region of side `side` centered on `(cx, cy)` in full-frame
    /// coordinates, clamped to the frame bounds.
    ///
    /// Clamping moves the origin first, then shortens the extent, so the
    /// result may end up rectangular near an edge.
    pub fn centered(cx: f64, cy: f64, side: u32, frame_width: u32, frame_height: u32) -> Self {
        let half = f64::from(side) / 2.0;
        let x_start = (cx - half).max(0.0) as u32;
        let y_start = (cy - half).max(0.0) as u32;
        let x_start = x_start.min(frame_width.saturating_sub(1));
        let y_start = y_start.min(frame_height.saturating_sub(1));
        Self {
            x_start,
            y_start,
            width: side.min(frame_width - x_start),
            height: side.min(frame_height - y_start),
        }
    }

    /// Whether a full-frame point falls inside this region
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= f64::from(self.x_start)
            && x < f64::from(self.x_start + self.width)
            && y >= f64::from(self.y_start)
            && y < f64::from(self.y_start + self.height)
    }

    /// Center of the region in full-frame coordinates
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.x_start) + f64::from(self.width) / 2.0,
            f64::from(self.y_start) + f64::from(self.height) / 2.0,
        )
    }
}

/// A single candidate shape reported by a detector.
///
/// Coordinates are relative to the search region the detector was given;
/// use [`Detection::to_absolute`] to express them in full-frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Center x (pixels, region-relative)
    pub center_x: f64,

    /// Center y (pixels, region-relative)
    pub center_y: f64,

    /// Radius (pixels)
    pub radius: f64,
}

impl Detection {
    /// Lift a region-relative detection into full-frame coordinates
    pub fn to_absolute(&self, roi: &Roi) -> Detection {
        Detection {
            center_x: self.center_x + f64::from(roi.x_start),
            center_y: self.center_y + f64::from(roi.y_start),
            radius: self.radius,
        }
    }
}
