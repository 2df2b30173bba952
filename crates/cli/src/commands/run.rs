//! `run` command implementation.
//!
//! Wires the full sweep pipeline: serial session (real or mock), vision
//! collaborators, sinks, shutdown handling. The camera and detector are
//! the simulated implementations from `rig`; real ones plug in through
//! the `contracts::FrameSource` / `contracts::Detector` traits.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use contracts::{
    Detector, FrameSource, MeasurementSink, PixelScale, RigBlueprint, ShutdownFlag, Sleeper,
    SystemSleeper,
};
use rig::{MockCamera, MockDetector, MockLink};
use sweep::{SweepController, SweepPlan};
use transport::{ReconnectPolicy, SerialLink, SerialPortLink, Session};
use vision::{GateConfig, RegionTracker, TrackerConfig};

use crate::cli::RunArgs;

/// Execute the `run` command
pub fn run_sweep(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref port) = args.port {
        info!(port = %port, "Overriding serial port from CLI");
        blueprint.serial.port = port.clone();
    }
    if let Some(sweeps) = args.sweeps {
        info!(sweeps, "Overriding sweep count from CLI");
        blueprint.sweep.sweeps = sweeps;
    }

    info!(
        port = %blueprint.serial.port,
        baud_rate = blueprint.serial.baud_rate,
        start = blueprint.sweep.start_angle,
        end = blueprint.sweep.end_angle,
        step = blueprint.sweep.step,
        sinks = blueprint.sinks.len(),
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)
            .context("Failed to start metrics exporter")?;
    }

    // Ctrl+C flips the shared shutdown flag; the sweep and the reconnect
    // loop both poll it.
    let shutdown = ShutdownFlag::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            warn!("Received shutdown signal, stopping sweep...");
            shutdown.request();
        })
        .context("Failed to install Ctrl+C handler")?;
    }

    let mut sinks =
        recorder::create_sinks(&blueprint.sinks).context("Failed to build output sinks")?;
    if sinks.is_empty() {
        warn!("No sinks configured - measurements will only be logged");
        sinks.push(Box::new(recorder::LogSink::new("default_log")));
    }

    let mut camera = MockCamera::with_defaults();
    let detector = MockDetector::fixed(100.0, 100.0, 37.0);

    if args.mock {
        info!("Running against the mock rig");
        execute(
            MockLink::with_defaults(),
            &blueprint,
            shutdown,
            &mut camera,
            &detector,
            &mut sinks,
        )
    } else {
        let timeout = Duration::from_millis(blueprint.serial.timeout_ms);
        let link = SerialPortLink::open(&blueprint.serial.port, blueprint.serial.baud_rate, timeout)
            .with_context(|| format!("Failed to open serial port {}", blueprint.serial.port))?;
        execute(link, &blueprint, shutdown, &mut camera, &detector, &mut sinks)
    }
}

/// Build the controller over any link and run the sweep to completion
fn execute<L: SerialLink>(
    link: L,
    blueprint: &RigBlueprint,
    shutdown: ShutdownFlag,
    camera: &mut dyn FrameSource,
    detector: &dyn Detector,
    sinks: &mut [Box<dyn MeasurementSink>],
) -> Result<()> {
    let sleeper: Arc<dyn Sleeper> = Arc::new(SystemSleeper);
    let session = Session::new(
        link,
        ReconnectPolicy {
            interval: Duration::from_millis(blueprint.serial.reconnect_interval_ms),
        },
        sleeper.clone(),
        shutdown.clone(),
    );

    let scale = PixelScale::from_reference(
        blueprint.vision.reference_diameter_mm,
        blueprint.vision.reference_diameter_px,
    )
    .context("Invalid vision reference scale")?;

    let mut controller = SweepController::new(
        session,
        blueprint.serial.hardware_address,
        SweepPlan::from_config(&blueprint.sweep),
        Duration::from_millis(blueprint.sweep.settle_ms),
        blueprint.sweep.sweeps,
        GateConfig {
            max_attempts: blueprint.vision.max_attempts,
            tolerance_mm: blueprint.vision.tolerance_mm,
            scale,
        },
        RegionTracker::new(TrackerConfig::from_vision(&blueprint.vision)),
        sleeper,
        shutdown,
    );

    info!("Starting sweep...");
    let outcome = controller
        .run(camera, detector, sinks)
        .context("Sweep execution failed")?;

    println!("{}", outcome.summary);
    info!(
        records = outcome.records.len(),
        duration_secs = outcome.duration.as_secs_f64(),
        "feeder-rig finished"
    );
    Ok(())
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &RigBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Serial:");
    println!("  Port: {}", blueprint.serial.port);
    println!("  Baud rate: {}", blueprint.serial.baud_rate);
    println!("  Timeout: {} ms", blueprint.serial.timeout_ms);
    println!("\nSweep:");
    println!(
        "  Range: {} -> {} (step -{})",
        blueprint.sweep.start_angle, blueprint.sweep.end_angle, blueprint.sweep.step
    );
    println!("  Home: {}", blueprint.sweep.home_angle);
    println!("  Settle: {} ms", blueprint.sweep.settle_ms);
    println!("  Sweeps: {}", blueprint.sweep.sweeps);
    println!("\nVision:");
    println!(
        "  Scale: {} mm / {} px",
        blueprint.vision.reference_diameter_mm, blueprint.vision.reference_diameter_px
    );
    println!("  Tolerance: {} mm", blueprint.vision.tolerance_mm);
    println!("  Max attempts: {}", blueprint.vision.max_attempts);

    if !blueprint.sinks.is_empty() {
        println!("\nSinks ({}):", blueprint.sinks.len());
        for sink in &blueprint.sinks {
            println!("  - {} ({:?})", sink.name, sink.sink_type);
        }
    }

    println!();
}
