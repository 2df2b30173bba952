//! Configuration parsing
//!
//! Supports TOML (primary) and JSON (secondary) formats.

use contracts::{RigBlueprint, RigError};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<RigBlueprint, RigError> {
    toml::from_str(content).map_err(|e| RigError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<RigBlueprint, RigError> {
    serde_json::from_str(content).map_err(|e| RigError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration in the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<RigBlueprint, RigError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SinkType;

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
[serial]
port = "/dev/ttyACM0"
baud_rate = 115200
timeout_ms = 5000
hardware_address = 0

[sweep]
home_angle = 900
start_angle = 900
end_angle = 280
step = 5
settle_ms = 200

[vision]
reference_diameter_mm = 1.4
reference_diameter_px = 72.0
tolerance_mm = 0.2
max_attempts = 5

[[sinks]]
name = "table"
sink_type = "csv"
[sinks.params]
path = "./sweep.csv"

[[sinks]]
name = "console"
sink_type = "log"
"#;
        let bp = parse_toml(content).unwrap();
        assert_eq!(bp.serial.port, "/dev/ttyACM0");
        assert_eq!(bp.sweep.settle_ms, 200);
        assert!((bp.vision.reference_diameter_mm - 1.4).abs() < 1e-12);
        assert_eq!(bp.sinks.len(), 2);
        assert_eq!(bp.sinks[0].sink_type, SinkType::Csv);
        assert_eq!(bp.sinks[0].params.get("path").unwrap(), "./sweep.csv");
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "serial": { "port": "/dev/ttyACM0" },
            "sinks": [{ "name": "console", "sink_type": "log" }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, RigError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
