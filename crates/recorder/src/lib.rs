//! # Recorder
//!
//! Persistence for accepted measurements. Sinks are append-only; a
//! record handed to `record` is never revisited. Storage format is a
//! per-sink concern behind [`contracts::MeasurementSink`].

mod factory;
mod sinks;

pub use factory::create_sinks;
pub use sinks::{CsvSink, JsonlSink, LogSink};
