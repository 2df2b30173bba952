//! LogSink - logs measurement summaries via tracing

use contracts::{MeasurementRecord, MeasurementSink, RigError};
use tracing::info;

/// Sink that logs measurements for debugging
pub struct LogSink {
    name: String,
    records: u64,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: 0,
        }
    }
}

impl MeasurementSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn record(&mut self, record: &MeasurementRecord) -> Result<(), RigError> {
        self.records += 1;
        info!(
            sink = %self.name,
            index = record.commanded_index,
            x_mm = record.position.x_mm,
            y_mm = record.position.y_mm,
            attempts = record.attempts,
            "measurement recorded"
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RigError> {
        info!(sink = %self.name, records = self.records, "log sink flushed");
        Ok(())
    }
}
