//! CsvSink - the sweep's primary output table.
//!
//! One row per accepted measurement: position along the travel axis in
//! millimetres, and the servo index it was measured at. The header and
//! column order are consumed by downstream calibration scripts, so they
//! are fixed.

use contracts::{MeasurementRecord, MeasurementSink, RigError};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

const HEADER: &str = "x_position_mm,index";

/// Configuration for CsvSink
#[derive(Debug, Clone)]
pub struct CsvSinkConfig {
    /// Output file path
    pub path: PathBuf,
}

impl CsvSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, RigError> {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .ok_or_else(|| RigError::config_validation("sinks.params.path", "csv sink requires a 'path' param"))?;
        Ok(Self { path })
    }
}

/// Sink that appends measurements to a CSV table
pub struct CsvSink {
    name: String,
    writer: BufWriter<File>,
    rows: u64,
}

impl CsvSink {
    /// Create the output file and write the header
    pub fn new(name: impl Into<String>, path: &Path) -> Result<Self, RigError> {
        let name = name.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{HEADER}")
            .map_err(|e| RigError::sink_write(&name, e.to_string()))?;

        debug!(sink = %name, path = %path.display(), "csv sink opened");
        Ok(Self {
            name,
            writer,
            rows: 0,
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, RigError> {
        let config = CsvSinkConfig::from_params(params)?;
        Self::new(name, &config.path)
    }
}

impl MeasurementSink for CsvSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn record(&mut self, record: &MeasurementRecord) -> Result<(), RigError> {
        writeln!(
            self.writer,
            "{:.3},{}",
            record.position.x_mm, record.commanded_index
        )
        .map_err(|e| {
            error!(sink = %self.name, error = %e, "csv row write failed");
            RigError::sink_write(&self.name, e.to_string())
        })?;
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RigError> {
        self.writer
            .flush()
            .map_err(|e| RigError::sink_write(&self.name, e.to_string()))?;
        debug!(sink = %self.name, rows = self.rows, "csv sink flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::PositionEstimate;
    use tempfile::tempdir;

    fn record(x_mm: f64, index: u16) -> MeasurementRecord {
        MeasurementRecord {
            position: PositionEstimate { x_mm, y_mm: 0.0 },
            commanded_index: index,
            attempts: 1,
        }
    }

    #[test]
    fn test_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sweep.csv");

        let mut sink = CsvSink::new("csv", &path).unwrap();
        sink.record(&record(1.944, 900)).unwrap();
        sink.record(&record(2.5, 895)).unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["x_position_mm,index", "1.944,900", "2.500,895"]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/sweep.csv");
        let mut sink = CsvSink::new("csv", &path).unwrap();
        sink.flush().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_from_params_requires_path() {
        let err = CsvSinkConfig::from_params(&HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("path"));
    }
}
