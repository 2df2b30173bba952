//! Configuration validation
//!
//! Rules:
//! - serial.port non-empty, baud_rate and timeout_ms > 0
//! - sweep descends: start_angle >= end_angle, step > 0, sweeps >= 1
//! - vision reference diameters, tolerance, attempt budget all positive
//! - sink names non-empty and unique; file sinks carry a 'path' param

use std::collections::HashSet;

use contracts::{RigBlueprint, RigError, SinkType};

/// Validate a RigBlueprint
///
/// Returns the first violation encountered, or Ok(()).
pub fn validate(blueprint: &RigBlueprint) -> Result<(), RigError> {
    validate_serial(blueprint)?;
    validate_sweep(blueprint)?;
    validate_vision(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

fn validate_serial(blueprint: &RigBlueprint) -> Result<(), RigError> {
    let serial = &blueprint.serial;
    if serial.port.is_empty() {
        return Err(RigError::config_validation(
            "serial.port",
            "serial port path cannot be empty",
        ));
    }
    if serial.baud_rate == 0 {
        return Err(RigError::config_validation(
            "serial.baud_rate",
            "baud_rate must be > 0",
        ));
    }
    if serial.timeout_ms == 0 {
        return Err(RigError::config_validation(
            "serial.timeout_ms",
            "timeout_ms must be > 0",
        ));
    }
    Ok(())
}

fn validate_sweep(blueprint: &RigBlueprint) -> Result<(), RigError> {
    let sweep = &blueprint.sweep;
    if sweep.start_angle < sweep.end_angle {
        return Err(RigError::config_validation(
            "sweep.start_angle / sweep.end_angle",
            format!(
                "sweep descends: start_angle ({}) must be >= end_angle ({})",
                sweep.start_angle, sweep.end_angle
            ),
        ));
    }
    if sweep.step == 0 {
        return Err(RigError::config_validation("sweep.step", "step must be > 0"));
    }
    if sweep.sweeps == 0 {
        return Err(RigError::config_validation(
            "sweep.sweeps",
            "sweeps must be >= 1",
        ));
    }
    Ok(())
}

fn validate_vision(blueprint: &RigBlueprint) -> Result<(), RigError> {
    let vision = &blueprint.vision;
    if vision.reference_diameter_mm <= 0.0 || vision.reference_diameter_px <= 0.0 {
        return Err(RigError::config_validation(
            "vision.reference_diameter_mm / vision.reference_diameter_px",
            format!(
                "reference diameters must be > 0, got {} mm / {} px",
                vision.reference_diameter_mm, vision.reference_diameter_px
            ),
        ));
    }
    if vision.tolerance_mm <= 0.0 {
        return Err(RigError::config_validation(
            "vision.tolerance_mm",
            format!("tolerance_mm must be > 0, got {}", vision.tolerance_mm),
        ));
    }
    if vision.max_attempts == 0 {
        return Err(RigError::config_validation(
            "vision.max_attempts",
            "max_attempts must be >= 1",
        ));
    }
    if vision.shrink_factor <= 0.0 {
        return Err(RigError::config_validation(
            "vision.shrink_factor",
            format!("shrink_factor must be > 0, got {}", vision.shrink_factor),
        ));
    }
    if vision.min_roi_side == 0 {
        return Err(RigError::config_validation(
            "vision.min_roi_side",
            "min_roi_side must be >= 1",
        ));
    }
    if vision.miss_limit == 0 {
        return Err(RigError::config_validation(
            "vision.miss_limit",
            "miss_limit must be >= 1",
        ));
    }
    Ok(())
}

fn validate_sinks(blueprint: &RigBlueprint) -> Result<(), RigError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(RigError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(&sink.name) {
            return Err(RigError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        let needs_path = matches!(sink.sink_type, SinkType::Csv | SinkType::Jsonl);
        if needs_path && !sink.params.contains_key("path") {
            return Err(RigError::config_validation(
                format!("sinks[{}].params.path", sink.name),
                "file sinks require a 'path' param",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        ConfigVersion, SerialConfig, SinkConfig, SweepConfig, VisionConfig,
    };
    use std::collections::HashMap;

    fn minimal_blueprint() -> RigBlueprint {
        let mut params = HashMap::new();
        params.insert("path".to_string(), "./sweep.csv".to_string());
        RigBlueprint {
            version: ConfigVersion::V1,
            serial: SerialConfig {
                port: "/dev/ttyACM0".into(),
                baud_rate: 115_200,
                timeout_ms: 5_000,
                reconnect_interval_ms: 2_000,
                hardware_address: 0,
            },
            sweep: SweepConfig::default(),
            vision: VisionConfig::default(),
            sinks: vec![SinkConfig {
                name: "table".into(),
                sink_type: SinkType::Csv,
                params,
            }],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_blueprint()).is_ok());
    }

    #[test]
    fn test_empty_port() {
        let mut bp = minimal_blueprint();
        bp.serial.port = String::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("serial.port"), "got: {err}");
    }

    #[test]
    fn test_ascending_sweep_rejected() {
        let mut bp = minimal_blueprint();
        bp.sweep.start_angle = 280;
        bp.sweep.end_angle = 900;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("start_angle"), "got: {err}");
    }

    #[test]
    fn test_zero_step_rejected() {
        let mut bp = minimal_blueprint();
        bp.sweep.step = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("step"), "got: {err}");
    }

    #[test]
    fn test_zero_tolerance_rejected() {
        let mut bp = minimal_blueprint();
        bp.vision.tolerance_mm = 0.0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("tolerance_mm"), "got: {err}");
    }

    #[test]
    fn test_zero_reference_diameter_rejected() {
        let mut bp = minimal_blueprint();
        bp.vision.reference_diameter_px = 0.0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("reference_diameter"), "got: {err}");
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut bp = minimal_blueprint();
        bp.sinks.push(bp.sinks[0].clone());
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("duplicate sink name"), "got: {err}");
    }

    #[test]
    fn test_csv_sink_without_path() {
        let mut bp = minimal_blueprint();
        bp.sinks[0].params.clear();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("path"), "got: {err}");
    }

    #[test]
    fn test_single_position_sweep_allowed() {
        let mut bp = minimal_blueprint();
        bp.sweep.start_angle = 500;
        bp.sweep.end_angle = 500;
        assert!(validate(&bp).is_ok());
    }
}
