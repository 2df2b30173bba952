//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    port: String,
    step_count: usize,
    sweeps: u32,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            let step_count =
                sweep::SweepPlan::from_config(&blueprint.sweep).len();

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    port: blueprint.serial.port.clone(),
                    step_count,
                    sweeps: blueprint.sweep.sweeps,
                    sink_count: blueprint.sinks.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &contracts::RigBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    // Check for empty sinks
    if blueprint.sinks.is_empty() {
        warnings.push("No sinks configured - measurements will only be logged".to_string());
    }

    // A home position outside the swept range leaves the tracker unseeded
    // until the first in-range frame
    if blueprint.sweep.home_angle > blueprint.sweep.start_angle
        || blueprint.sweep.home_angle < blueprint.sweep.end_angle
    {
        warnings.push(format!(
            "sweep.home_angle ({}) lies outside the swept range {}..{}",
            blueprint.sweep.home_angle, blueprint.sweep.end_angle, blueprint.sweep.start_angle
        ));
    }

    if blueprint.sweep.settle_ms == 0 {
        warnings.push(
            "sweep.settle_ms is 0 - frames may be captured while the servo is still moving"
                .to_string(),
        );
    }

    if blueprint.vision.tolerance_mm >= blueprint.vision.reference_diameter_mm {
        warnings.push(format!(
            "vision.tolerance_mm ({}) is at least one reference diameter ({} mm) - the stability gate will accept almost anything",
            blueprint.vision.tolerance_mm, blueprint.vision.reference_diameter_mm
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Port: {}", summary.port);
            println!("  Steps per sweep: {}", summary.step_count);
            println!("  Sweeps: {}", summary.sweeps);
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
