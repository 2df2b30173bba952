//! RigBlueprint - Config Loader output
//!
//! Describes a complete measurement run: serial link parameters, sweep
//! plan, vision tuning, and output routing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete rig configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Serial link settings
    pub serial: SerialConfig,

    /// Sweep plan settings
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Visual feedback settings
    #[serde(default)]
    pub vision: VisionConfig,

    /// Output routing
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

/// Serial link configuration
///
/// The bus is half-duplex 8N1 without flow control; only the device path,
/// baud rate, and timeouts vary per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial device path (e.g., "/dev/ttyACM0")
    pub port: String,

    /// Baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Read/write timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Delay between reconnect attempts, in milliseconds
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,

    /// Target device address on the bus
    #[serde(default)]
    pub hardware_address: u8,
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_reconnect_interval_ms() -> u64 {
    2_000
}

/// Sweep plan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Position commanded before the sweep starts
    #[serde(default = "default_home_angle")]
    pub home_angle: u16,

    /// First commanded position (inclusive)
    #[serde(default = "default_start_angle")]
    pub start_angle: u16,

    /// Last commanded position (inclusive)
    #[serde(default = "default_end_angle")]
    pub end_angle: u16,

    /// Descending step between positions
    #[serde(default = "default_step")]
    pub step: u16,

    /// Settling time after each move, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Number of consecutive sweeps to run
    #[serde(default = "default_sweeps")]
    pub sweeps: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            home_angle: default_home_angle(),
            start_angle: default_start_angle(),
            end_angle: default_end_angle(),
            step: default_step(),
            settle_ms: default_settle_ms(),
            sweeps: default_sweeps(),
        }
    }
}

fn default_home_angle() -> u16 {
    900
}

fn default_start_angle() -> u16 {
    900
}

fn default_end_angle() -> u16 {
    280
}

fn default_step() -> u16 {
    5
}

fn default_settle_ms() -> u64 {
    200
}

fn default_sweeps() -> u32 {
    1
}

/// Visual feedback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Physical diameter of the reference circle, in millimeters
    #[serde(default = "default_reference_diameter_mm")]
    pub reference_diameter_mm: f64,

    /// Apparent diameter of the reference circle, in pixels
    #[serde(default = "default_reference_diameter_px")]
    pub reference_diameter_px: f64,

    /// Two-sample agreement tolerance, in millimeters
    #[serde(default = "default_tolerance_mm")]
    pub tolerance_mm: f64,

    /// Stability-gate attempts per sweep step
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Search-region side as a multiple of the detected diameter
    #[serde(default = "default_shrink_factor")]
    pub shrink_factor: f64,

    /// Minimum usable search-region side, in pixels
    #[serde(default = "default_min_roi_side")]
    pub min_roi_side: u32,

    /// Consecutive misses before falling back to a full-frame search
    #[serde(default = "default_miss_limit")]
    pub miss_limit: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            reference_diameter_mm: default_reference_diameter_mm(),
            reference_diameter_px: default_reference_diameter_px(),
            tolerance_mm: default_tolerance_mm(),
            max_attempts: default_max_attempts(),
            shrink_factor: default_shrink_factor(),
            min_roi_side: default_min_roi_side(),
            miss_limit: default_miss_limit(),
        }
    }
}

fn default_reference_diameter_mm() -> f64 {
    1.4
}

fn default_reference_diameter_px() -> f64 {
    72.0
}

// 10 px of disagreement at the reference scale, rounded up
fn default_tolerance_mm() -> f64 {
    0.2
}

fn default_max_attempts() -> u32 {
    5
}

fn default_shrink_factor() -> f64 {
    2.0
}

fn default_min_roi_side() -> u32 {
    24
}

fn default_miss_limit() -> u32 {
    3
}

/// Output sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Unique sink name
    pub name: String,

    /// Sink kind
    pub sink_type: SinkType,

    /// Sink-specific parameters (e.g., "path")
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Sink kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// CSV file with `x_position_mm,index` rows
    Csv,
    /// One JSON record per line
    Jsonl,
    /// Summary via tracing
    Log,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_blueprint_deserializes_with_defaults() {
        let json = r#"{ "serial": { "port": "/dev/ttyACM0" } }"#;
        let blueprint: RigBlueprint = serde_json::from_str(json).unwrap();
        assert_eq!(blueprint.serial.baud_rate, 115_200);
        assert_eq!(blueprint.serial.hardware_address, 0);
        assert_eq!(blueprint.sweep.start_angle, 900);
        assert_eq!(blueprint.sweep.end_angle, 280);
        assert_eq!(blueprint.sweep.step, 5);
        assert_eq!(blueprint.vision.max_attempts, 5);
        assert!(blueprint.sinks.is_empty());
    }

    #[test]
    fn test_sink_type_snake_case() {
        let config: SinkConfig =
            serde_json::from_str(r#"{ "name": "out", "sink_type": "csv" }"#).unwrap();
        assert_eq!(config.sink_type, SinkType::Csv);
    }
}
