//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (reports and structured errors).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

pub fn json_mode() -> bool {
    JSON_MODE.get().copied().unwrap_or(false)
}

#[derive(Parser, Debug)]
#[command(name = "servo", version, about = "Servo motion CLI")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/servo.toml")]
    pub config: PathBuf,

    /// Print reports and errors as JSON lines; log as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Move to the configured starting level and report
    Init,
    /// Initialize, then move to a level
    Move {
        /// Target level (0..=100; values outside are clamped at the servo)
        #[arg(long, allow_hyphen_values = true)]
        level: i32,
        /// Seconds for a full 0..=100 sweep (defaults to servo.move_time_ms)
        #[arg(long, allow_hyphen_values = true)]
        duration: Option<i32>,
    },
    /// Initialize, then handle one raw "<prefix> <level>:<duration>" command
    Send {
        /// Raw command text, e.g. "servo1 75:3"
        command: String,
    },
    /// Initialize, then handle commands from stdin, one per line, until EOF or Ctrl-C
    Run,
    /// Attach and detach the servo once (hardware presence / sim ok)
    SelfCheck,
}
