//! # Integration Tests
//!
//! End-to-end scenarios over the mock rig: configuration in, serial
//! frames and sink files out. Everything runs without hardware.

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod wire_tests {
    use protocol::{decode_any, Message};

    #[test]
    fn test_rotate_servo_wire_frame() {
        // 900 = 0x0384 little-endian, CRC16 0xFD20 appended high byte first
        let frame = Message::RotateServo {
            hardware_address: 0,
            angle: 900,
        }
        .encode();
        assert_eq!(frame, vec![0x0A, 0x00, 0x84, 0x03, 0xFD, 0x20]);
    }

    #[test]
    fn test_set_led_level_wire_frame() {
        let frame = Message::SetLedLevel {
            hardware_address: 0,
            level: 50,
        }
        .encode();
        assert_eq!(frame, vec![0x65, 0x00, 0x32, 0x0A, 0xE0]);
    }

    #[test]
    fn test_enter_bootloader_wire_frame() {
        let frame = Message::EnterBootloader { hardware_address: 0 }.encode();
        assert_eq!(frame, vec![0x7D, 0x00, 0xE0, 0x20]);
    }

    #[test]
    fn test_every_command_survives_the_wire() {
        for msg in [
            Message::Empty { hardware_address: 3 },
            Message::RotateServo {
                hardware_address: 0,
                angle: 280,
            },
            Message::SetLedLevel {
                hardware_address: 1,
                level: 100,
            },
            Message::EnterBootloader { hardware_address: 0 },
        ] {
            assert_eq!(decode_any(&msg.encode()), Ok(msg));
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        MeasurementSink, NoopSleeper, PixelScale, RigBlueprint, ShutdownFlag, Sleeper,
    };
    use protocol::{decode_any, Message};
    use recorder::create_sinks;
    use rig::{MockCamera, MockDetector, MockLink, MockLinkConfig};
    use sweep::{SweepController, SweepOutcome, SweepPlan};
    use transport::{ReconnectPolicy, Session};
    use vision::{GateConfig, RegionTracker, TrackerConfig};

    const FULL_SWEEP_TOML: &str = r#"
[serial]
port = "/dev/ttyACM0"

[[sinks]]
name = "table"
sink_type = "csv"
[sinks.params]
path = "__CSV__"

[[sinks]]
name = "stream"
sink_type = "jsonl"
[sinks.params]
path = "__JSONL__"
"#;

    /// Wire a controller over the given mock link, straight from a blueprint
    fn run_blueprint(blueprint: &RigBlueprint, link: MockLink) -> (SweepOutcome, rig::LinkStats) {
        let stats = link.stats();
        let sleeper: Arc<dyn Sleeper> = Arc::new(NoopSleeper);
        let shutdown = ShutdownFlag::new();
        let session = Session::new(
            link,
            ReconnectPolicy {
                interval: Duration::from_millis(blueprint.serial.reconnect_interval_ms),
            },
            sleeper.clone(),
            shutdown.clone(),
        );
        let mut controller = SweepController::new(
            session,
            blueprint.serial.hardware_address,
            SweepPlan::from_config(&blueprint.sweep),
            Duration::from_millis(0),
            blueprint.sweep.sweeps,
            GateConfig {
                max_attempts: blueprint.vision.max_attempts,
                tolerance_mm: blueprint.vision.tolerance_mm,
                scale: PixelScale::from_reference(
                    blueprint.vision.reference_diameter_mm,
                    blueprint.vision.reference_diameter_px,
                )
                .unwrap(),
            },
            RegionTracker::new(TrackerConfig::from_vision(&blueprint.vision)),
            sleeper,
            shutdown,
        );

        let mut camera = MockCamera::with_defaults();
        let detector = MockDetector::fixed(100.0, 100.0, 37.0);
        let mut sinks: Vec<Box<dyn MeasurementSink>> =
            create_sinks(&blueprint.sinks).unwrap();

        let outcome = controller.run(&mut camera, &detector, &mut sinks).unwrap();
        let stats = stats.lock().unwrap().clone();
        (outcome, stats)
    }

    /// Config in, CSV and JSONL out: the full default sweep over the mock rig
    #[test]
    fn test_e2e_full_sweep_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("sweep.csv");
        let jsonl_path = dir.path().join("sweep.jsonl");
        let toml = FULL_SWEEP_TOML
            .replace("__CSV__", &csv_path.display().to_string())
            .replace("__JSONL__", &jsonl_path.display().to_string());
        let blueprint = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();

        let (outcome, stats) = run_blueprint(&blueprint, MockLink::with_defaults());

        // 900 down to 280 in steps of 5, inclusive both ends
        assert_eq!(outcome.records.len(), 125);
        assert_eq!(outcome.summary.recorded, 125);
        assert_eq!(outcome.summary.skipped, 0);
        // one home move plus one per position
        assert_eq!(stats.frames.len(), 126);

        // a fixed part means one identical estimate at every step
        let expected_x = 100.0 * (1.4 / 72.0);
        for record in &outcome.records {
            assert!((record.position.x_mm - expected_x).abs() < 1e-9);
            assert_eq!(record.attempts, 1);
        }

        let csv = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "x_position_mm,index");
        assert_eq!(lines.len(), 126);
        assert_eq!(lines[1], format!("{expected_x:.3},900"));
        assert_eq!(lines[125], format!("{expected_x:.3},280"));

        let jsonl = std::fs::read_to_string(&jsonl_path).unwrap();
        assert_eq!(jsonl.lines().count(), 125);
        let first: serde_json::Value = serde_json::from_str(jsonl.lines().next().unwrap()).unwrap();
        assert_eq!(first["commanded_index"], 900);
    }

    /// Every frame on the wire is a correctly addressed servo move, in
    /// descending command order
    #[test]
    fn test_e2e_wire_order_matches_plan() {
        let toml = r#"
[serial]
port = "/dev/ttyACM0"
hardware_address = 2

[sweep]
start_angle = 900
end_angle = 880
step = 10
"#;
        let blueprint = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        let (_, stats) = run_blueprint(&blueprint, MockLink::with_defaults());

        let angles: Vec<u16> = stats
            .frames
            .iter()
            .map(|frame| match decode_any(frame).unwrap() {
                Message::RotateServo {
                    hardware_address,
                    angle,
                } => {
                    assert_eq!(hardware_address, 2);
                    angle
                }
                other => panic!("unexpected frame {other:?}"),
            })
            .collect();
        assert_eq!(angles, vec![900, 900, 890, 880]);
    }

    /// A dropped link mid-sweep reconnects and loses nothing
    #[test]
    fn test_e2e_reconnect_keeps_output_complete() {
        let toml = r#"
[serial]
port = "/dev/ttyACM0"

[sweep]
start_angle = 900
end_angle = 880
step = 5
"#;
        let blueprint = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        // write 4 is the third commanded position; it fails once
        let link = MockLink::new(MockLinkConfig {
            fail_on_writes: vec![4],
            ..Default::default()
        });
        let (outcome, stats) = run_blueprint(&blueprint, link);

        assert_eq!(stats.reopens, 1);
        // home + five positions, the failed write retried after reconnect
        assert_eq!(stats.frames.len(), 6);
        let indices: Vec<u16> = outcome.records.iter().map(|r| r.commanded_index).collect();
        assert_eq!(indices, vec![900, 895, 890, 885, 880]);
    }
}
