//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    serial: SerialInfo,
    sweep: SweepInfo,
    vision: VisionInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct SerialInfo {
    port: String,
    baud_rate: u32,
    timeout_ms: u64,
    reconnect_interval_ms: u64,
    hardware_address: u8,
}

#[derive(Serialize)]
struct SweepInfo {
    home_angle: u16,
    start_angle: u16,
    end_angle: u16,
    step: u16,
    step_count: usize,
    settle_ms: u64,
    sweeps: u32,
}

#[derive(Serialize)]
struct VisionInfo {
    mm_per_px: f64,
    tolerance_mm: f64,
    max_attempts: u32,
    shrink_factor: f64,
    min_roi_side: u32,
    miss_limit: u32,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn build_config_info(blueprint: &contracts::RigBlueprint) -> ConfigInfo {
    let step_count = sweep::SweepPlan::from_config(&blueprint.sweep).len();
    let mm_per_px =
        blueprint.vision.reference_diameter_mm / blueprint.vision.reference_diameter_px;

    let sinks = blueprint
        .sinks
        .iter()
        .map(|s| SinkInfo {
            name: s.name.clone(),
            sink_type: format!("{:?}", s.sink_type),
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        serial: SerialInfo {
            port: blueprint.serial.port.clone(),
            baud_rate: blueprint.serial.baud_rate,
            timeout_ms: blueprint.serial.timeout_ms,
            reconnect_interval_ms: blueprint.serial.reconnect_interval_ms,
            hardware_address: blueprint.serial.hardware_address,
        },
        sweep: SweepInfo {
            home_angle: blueprint.sweep.home_angle,
            start_angle: blueprint.sweep.start_angle,
            end_angle: blueprint.sweep.end_angle,
            step: blueprint.sweep.step,
            step_count,
            settle_ms: blueprint.sweep.settle_ms,
            sweeps: blueprint.sweep.sweeps,
        },
        vision: VisionInfo {
            mm_per_px,
            tolerance_mm: blueprint.vision.tolerance_mm,
            max_attempts: blueprint.vision.max_attempts,
            shrink_factor: blueprint.vision.shrink_factor,
            min_roi_side: blueprint.vision.min_roi_side,
            miss_limit: blueprint.vision.miss_limit,
        },
        sinks,
    }
}

fn print_config_info(blueprint: &contracts::RigBlueprint) {
    let step_count = sweep::SweepPlan::from_config(&blueprint.sweep).len();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                Feeder Rig Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Serial link
    println!("🔌 Serial");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Port: {}", blueprint.serial.port);
    println!("   ├─ Baud rate: {}", blueprint.serial.baud_rate);
    println!("   ├─ Ack timeout: {} ms", blueprint.serial.timeout_ms);
    println!(
        "   ├─ Reconnect interval: {} ms",
        blueprint.serial.reconnect_interval_ms
    );
    println!(
        "   └─ Hardware address: {}",
        blueprint.serial.hardware_address
    );

    // Sweep
    println!("\n🔁 Sweep");
    println!(
        "   ├─ Range: {} -> {} (step -{}, {} positions)",
        blueprint.sweep.start_angle, blueprint.sweep.end_angle, blueprint.sweep.step, step_count
    );
    println!("   ├─ Home: {}", blueprint.sweep.home_angle);
    println!("   ├─ Settle: {} ms", blueprint.sweep.settle_ms);
    println!("   └─ Sweeps: {}", blueprint.sweep.sweeps);

    // Vision
    println!("\n📷 Vision");
    println!(
        "   ├─ Reference: {} mm / {} px",
        blueprint.vision.reference_diameter_mm, blueprint.vision.reference_diameter_px
    );
    println!("   ├─ Tolerance: {} mm", blueprint.vision.tolerance_mm);
    println!("   ├─ Max gate attempts: {}", blueprint.vision.max_attempts);
    println!(
        "   ├─ ROI: shrink x{}, min side {} px",
        blueprint.vision.shrink_factor, blueprint.vision.min_roi_side
    );
    println!("   └─ Miss limit: {}", blueprint.vision.miss_limit);

    // Sinks
    if !blueprint.sinks.is_empty() {
        println!("\n📤 Sinks ({})", blueprint.sinks.len());
        for (i, sink) in blueprint.sinks.iter().enumerate() {
            let is_last = i == blueprint.sinks.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            println!("   {} {} ({:?})", prefix, sink.name, sink.sink_type);
        }
    }

    println!();
}
