//! Mock Sweep Demo
//!
//! Runs a complete measurement sweep against the simulated rig: scripted
//! serial link, synthetic camera, canned detector. No hardware required.
//!
//! Run with: cargo run --bin mock_sweep [-- path/to/rig.toml]

use std::sync::Arc;
use std::time::Duration;

use config_loader::ConfigLoader;
use contracts::{
    MeasurementSink, PixelScale, RigBlueprint, SerialConfig, ShutdownFlag, Sleeper, SystemSleeper,
};
use observability::{LogFormat, ObservabilityConfig};
use rig::{MockCamera, MockDetector, MockLink};
use sweep::{SweepController, SweepPlan};
use transport::{ReconnectPolicy, Session};
use vision::{GateConfig, RegionTracker, TrackerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_with_config(ObservabilityConfig {
        log_format: LogFormat::Pretty,
        metrics_port: None,
        default_log_level: "info".to_string(),
    })?;

    tracing::info!("Starting Mock Sweep Demo");

    // ==== Stage 1: Use default config or load from file ====
    let blueprint = if let Some(path) = std::env::args().nth(1) {
        tracing::info!(path = %path, "Loading rig config");
        ConfigLoader::load_from_path(std::path::Path::new(&path))?
    } else {
        create_test_blueprint()
    };

    // ==== Stage 2: Build the simulated rig ====
    let link = MockLink::with_defaults();
    let stats = link.stats();
    let mut camera = MockCamera::with_defaults();
    let detector = MockDetector::fixed(100.0, 100.0, 37.0);

    let shutdown = ShutdownFlag::new();
    let sleeper: Arc<dyn Sleeper> = Arc::new(SystemSleeper);
    let session = Session::new(
        link,
        ReconnectPolicy {
            interval: Duration::from_millis(blueprint.serial.reconnect_interval_ms),
        },
        sleeper.clone(),
        shutdown.clone(),
    );

    // ==== Stage 3: Wire the controller ====
    let scale = PixelScale::from_reference(
        blueprint.vision.reference_diameter_mm,
        blueprint.vision.reference_diameter_px,
    )?;
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

    let mut sinks: Vec<Box<dyn MeasurementSink>> = recorder::create_sinks(&blueprint.sinks)?;
    if sinks.is_empty() {
        sinks.push(Box::new(recorder::LogSink::new("demo_log")));
    }

    // ==== Stage 4: Run ====
    let outcome = controller.run(&mut camera, &detector, &mut sinks)?;

    println!("{}", outcome.summary);
    let stats = stats.lock().map_err(|_| "link stats lock poisoned")?;
    tracing::info!(
        records = outcome.records.len(),
        frames_on_wire = stats.frames.len(),
        duration_ms = outcome.duration.as_millis() as u64,
        "Demo completed"
    );

    Ok(())
}

fn create_test_blueprint() -> RigBlueprint {
    RigBlueprint {
        version: contracts::ConfigVersion::V1,
        serial: SerialConfig {
            port: "mock".to_string(),
            baud_rate: 115_200,
            timeout_ms: 5_000,
            reconnect_interval_ms: 2_000,
            hardware_address: 0,
        },
        sweep: contracts::SweepConfig {
            // a short pass so the demo finishes quickly
            start_angle: 900,
            end_angle: 850,
            settle_ms: 10,
            ..Default::default()
        },
        vision: contracts::VisionConfig::default(),
        sinks: vec![],
    }
}
