//! # Sweep
//!
//! The measurement run itself: home the servo, walk it down the
//! commanded range one step at a time, and at every step settle, acquire
//! a stable position through the vision gate, and hand the accepted
//! record to the configured sinks.

mod controller;
mod plan;

pub use controller::{SweepController, SweepOutcome, SweepPhase};
pub use plan::SweepPlan;
