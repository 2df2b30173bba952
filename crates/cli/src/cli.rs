//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Feeder Rig - servo-swept optical position measurement
#[derive(Parser, Debug)]
#[command(
    name = "feeder-rig",
    author,
    version,
    about = "Feeder measurement rig controller",
    long_about = "Drives the feeder servo through its commanded range over a half-duplex\n\
                  serial bus, gates every position through two-frame visual agreement,\n\
                  and appends accepted measurements to the configured sinks."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "FEEDER_RIG_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "FEEDER_RIG_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a measurement sweep
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),

    /// Set the illumination LED level
    Led(LedArgs),

    /// Drive the servo to a single position
    Servo(ServoArgs),

    /// Reboot the controller into its USB bootloader
    Bootloader(BootloaderArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "rig.toml", env = "FEEDER_RIG_CONFIG")]
    pub config: PathBuf,

    /// Override serial device path from configuration
    #[arg(long, env = "FEEDER_RIG_PORT")]
    pub port: Option<String>,

    /// Run against the scripted mock rig instead of real hardware
    #[arg(long)]
    pub mock: bool,

    /// Override the number of consecutive sweeps from configuration
    #[arg(long, env = "FEEDER_RIG_SWEEPS")]
    pub sweeps: Option<u32>,

    /// Validate configuration and exit without running the sweep
    #[arg(long)]
    pub dry_run: bool,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "FEEDER_RIG_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "rig.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "rig.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `led` command
#[derive(Parser, Debug)]
pub struct LedArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "rig.toml", env = "FEEDER_RIG_CONFIG")]
    pub config: PathBuf,

    /// Override serial device path from configuration
    #[arg(long, env = "FEEDER_RIG_PORT")]
    pub port: Option<String>,

    /// LED brightness level
    pub level: u8,
}

/// Arguments for the `servo` command
#[derive(Parser, Debug)]
pub struct ServoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "rig.toml", env = "FEEDER_RIG_CONFIG")]
    pub config: PathBuf,

    /// Override serial device path from configuration
    #[arg(long, env = "FEEDER_RIG_PORT")]
    pub port: Option<String>,

    /// Commanded servo position
    pub angle: u16,
}

/// Arguments for the `bootloader` command
#[derive(Parser, Debug)]
pub struct BootloaderArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "rig.toml", env = "FEEDER_RIG_CONFIG")]
    pub config: PathBuf,

    /// Override serial device path from configuration
    #[arg(long, env = "FEEDER_RIG_PORT")]
    pub port: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
