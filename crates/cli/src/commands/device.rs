//! One-shot device utilities: `led`, `servo`, and `bootloader`.
//!
//! Each command loads the serial section of the configuration, opens the
//! port, sends a single frame through the acknowledged session, and
//! prints the raw ack bytes.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use contracts::{RigBlueprint, ShutdownFlag, Sleeper, SystemSleeper};
use protocol::Message;
use transport::{ReconnectPolicy, SerialPortLink, Session};

use crate::cli::{BootloaderArgs, LedArgs, ServoArgs};

/// Execute the `led` command
pub fn run_led(args: &LedArgs) -> Result<()> {
    let blueprint = load_serial_config(&args.config, args.port.as_deref())?;
    let message = Message::SetLedLevel {
        hardware_address: blueprint.serial.hardware_address,
        level: args.level,
    };
    info!(level = args.level, "Setting LED level");
    send_one(&blueprint, &message)
}

/// Execute the `servo` command
pub fn run_servo(args: &ServoArgs) -> Result<()> {
    let blueprint = load_serial_config(&args.config, args.port.as_deref())?;
    let message = Message::RotateServo {
        hardware_address: blueprint.serial.hardware_address,
        angle: args.angle,
    };
    info!(angle = args.angle, "Commanding servo position");
    send_one(&blueprint, &message)
}

/// Execute the `bootloader` command
pub fn run_bootloader(args: &BootloaderArgs) -> Result<()> {
    let blueprint = load_serial_config(&args.config, args.port.as_deref())?;

    if !args.yes && !confirm_bootloader(&blueprint.serial.port)? {
        println!("Aborted.");
        return Ok(());
    }

    let message = Message::EnterBootloader {
        hardware_address: blueprint.serial.hardware_address,
    };
    info!("Rebooting controller into bootloader");
    send_one(&blueprint, &message)?;
    println!("Controller is rebooting into its bootloader; the port will drop.");
    Ok(())
}

fn load_serial_config(config: &Path, port_override: Option<&str>) -> Result<RigBlueprint> {
    if !config.exists() {
        anyhow::bail!("Configuration file not found: {}", config.display());
    }
    let mut blueprint = config_loader::ConfigLoader::load_from_path(config)
        .with_context(|| format!("Failed to load config from {}", config.display()))?;
    if let Some(port) = port_override {
        blueprint.serial.port = port.to_string();
    }
    Ok(blueprint)
}

/// Open the configured port and run one acknowledged exchange
fn send_one(blueprint: &RigBlueprint, message: &Message) -> Result<()> {
    let timeout = Duration::from_millis(blueprint.serial.timeout_ms);
    let link = SerialPortLink::open(&blueprint.serial.port, blueprint.serial.baud_rate, timeout)
        .with_context(|| format!("Failed to open serial port {}", blueprint.serial.port))?;

    let sleeper: Arc<dyn Sleeper> = Arc::new(SystemSleeper);
    let mut session = Session::new(
        link,
        ReconnectPolicy {
            interval: Duration::from_millis(blueprint.serial.reconnect_interval_ms),
        },
        sleeper,
        ShutdownFlag::new(),
    );

    let ack = session
        .send_and_wait(message)
        .context("Device did not acknowledge the command")?;

    println!(
        "Acknowledged: {:02X} {:02X} {:02X} {:02X}",
        ack.raw[0], ack.raw[1], ack.raw[2], ack.raw[3]
    );
    Ok(())
}

fn confirm_bootloader(port: &str) -> Result<bool> {
    print!("Reboot the controller on {port} into its bootloader? [y/N] ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
