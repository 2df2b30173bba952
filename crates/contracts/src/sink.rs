//! MeasurementSink trait - persistence collaborator
//!
//! The core only needs a "record this measurement" capability; storage
//! format is a sink concern.

use crate::{MeasurementRecord, RigError};

/// An append-only destination for accepted measurements
pub trait MeasurementSink: Send {
    /// Sink name for logging and error attribution
    fn name(&self) -> &str;

    /// Append one record
    fn record(&mut self, record: &MeasurementRecord) -> Result<(), RigError>;

    /// Flush any buffered records to the backing store
    fn flush(&mut self) -> Result<(), RigError>;
}
