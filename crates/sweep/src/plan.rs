//! Sweep plan: the ordered set of servo positions for one pass.

use contracts::SweepConfig;

/// One descending pass over the servo range.
///
/// Positions run from `start_angle` down to `end_angle` inclusive in
/// decrements of `step`; when the span does not divide evenly the last
/// position is the lowest one still at or above `end_angle`.
#[derive(Debug, Clone, Copy)]
pub struct SweepPlan {
    /// Position commanded before stepping begins
    pub home_angle: u16,
    /// First commanded position (inclusive)
    pub start_angle: u16,
    /// Lower bound for commanded positions (inclusive)
    pub end_angle: u16,
    /// Descending step
    pub step: u16,
}

impl SweepPlan {
    pub fn from_config(config: &SweepConfig) -> Self {
        Self {
            home_angle: config.home_angle,
            start_angle: config.start_angle,
            end_angle: config.end_angle,
            step: config.step,
        }
    }

    /// Commanded positions in sweep order, descending.
    ///
    /// Indexes with u32 arithmetic: the widest plan (65535 down to 0 in
    /// steps of 1) has 65536 positions, one more than u16 holds.
    pub fn positions(&self) -> impl Iterator<Item = u16> + '_ {
        let start = u32::from(self.start_angle);
        let step = u32::from(self.step);
        (0..self.len() as u32).map(move |i| (start - i * step) as u16)
    }

    /// Number of positions in one pass
    pub fn len(&self) -> usize {
        ((self.start_angle - self.end_angle) / self.step) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
