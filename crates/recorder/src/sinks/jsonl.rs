//! JsonlSink - one JSON object per measurement.
//!
//! Richer than the CSV table: carries the full record including the y
//! position and the stability-gate attempt count.

use contracts::{MeasurementRecord, MeasurementSink, RigError};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Sink that appends measurements as JSON lines
pub struct JsonlSink {
    name: String,
    writer: BufWriter<File>,
}

impl JsonlSink {
    pub fn new(name: impl Into<String>, path: &Path) -> Result<Self, RigError> {
        let name = name.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        debug!(sink = %name, path = %path.display(), "jsonl sink opened");
        Ok(Self {
            name,
            writer: BufWriter::new(file),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, RigError> {
        let path = params.get("path").map(PathBuf::from).ok_or_else(|| {
            RigError::config_validation("sinks.params.path", "jsonl sink requires a 'path' param")
        })?;
        Self::new(name, &path)
    }
}

impl MeasurementSink for JsonlSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn record(&mut self, record: &MeasurementRecord) -> Result<(), RigError> {
        let line = serde_json::to_string(record)
            .map_err(|e| RigError::sink_write(&self.name, e.to_string()))?;
        writeln!(self.writer, "{line}").map_err(|e| {
            error!(sink = %self.name, error = %e, "jsonl line write failed");
            RigError::sink_write(&self.name, e.to_string())
        })
    }

    fn flush(&mut self) -> Result<(), RigError> {
        self.writer
            .flush()
            .map_err(|e| RigError::sink_write(&self.name, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::PositionEstimate;
    use tempfile::tempdir;

    #[test]
    fn test_one_object_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sweep.jsonl");

        let mut sink = JsonlSink::new("jsonl", &path).unwrap();
        sink.record(&MeasurementRecord {
            position: PositionEstimate {
                x_mm: 1.944,
                y_mm: 0.5,
            },
            commanded_index: 900,
            attempts: 2,
        })
        .unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let parsed: MeasurementRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.commanded_index, 900);
        assert_eq!(parsed.attempts, 2);
        assert!((parsed.position.y_mm - 0.5).abs() < 1e-12);
    }
}
