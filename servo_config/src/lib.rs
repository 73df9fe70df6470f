#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the servo driver.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - Actuator numbers (levels, angles) are deliberately not range-checked here:
//!   the motion controller clamps the resulting angle instead.
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct ServoSection {
    /// Name used as the first token of every state report
    pub name: String,
    /// Output pin driving the servo signal
    pub pin: u8,
    #[serde(default = "default_starting_level")]
    pub starting_level: i32,
    #[serde(default)]
    pub detach_after_move: bool,
    /// Default move time in milliseconds (converted to whole seconds by the core)
    #[serde(default = "default_move_time_ms")]
    pub move_time_ms: i32,
    #[serde(default)]
    pub zero_level_angle: i32,
    /// Angle for level 100. Also accepts the historical alias "benj_level_angle".
    #[serde(default = "default_full_level_angle", alias = "benj_level_angle")]
    pub full_level_angle: i32,
}

fn default_starting_level() -> i32 {
    50
}

fn default_move_time_ms() -> i32 {
    1000
}

fn default_full_level_angle() -> i32 {
    180
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MotionSection {
    /// Divisor applied to the theoretical per-degree delay to absorb loop overhead
    pub step_correction: f64,
    /// Hold time after a zero-distance move (ms)
    pub settle_ms: u64,
}

impl Default for MotionSection {
    fn default() -> Self {
        Self {
            step_correction: 1.8,
            settle_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Hardware {
    /// Pulse width for 0 degrees (microseconds)
    pub pulse_min_us: u32,
    /// Pulse width for 180 degrees (microseconds)
    pub pulse_max_us: u32,
    /// PWM frame period (ms)
    pub period_ms: u64,
}

// Keep in step with servo_hardware::util::{DEFAULT_PULSE_MIN_US,
// DEFAULT_PULSE_MAX_US, DEFAULT_PERIOD}; servo_cli tests check they agree.
impl Default for Hardware {
    fn default() -> Self {
        Self {
            pulse_min_us: 544,
            pulse_max_us: 2400,
            period_ms: 20,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub servo: ServoSection,
    #[serde(default)]
    pub motion: MotionSection,
    #[serde(default)]
    pub hardware: Hardware,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file in one go.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Servo
        if self.servo.name.trim().is_empty() {
            eyre::bail!("servo.name must not be empty");
        }
        if self.servo.name.chars().any(char::is_whitespace) {
            eyre::bail!("servo.name must not contain whitespace");
        }
        if self.servo.name.contains(':') {
            eyre::bail!("servo.name must not contain ':'");
        }

        // Motion
        if !self.motion.step_correction.is_finite() || self.motion.step_correction <= 0.0 {
            eyre::bail!("motion.step_correction must be > 0");
        }
        if self.motion.settle_ms > 60 * 1000 {
            eyre::bail!("motion.settle_ms is unreasonably large (>60s)");
        }

        // Hardware
        if self.hardware.pulse_min_us >= self.hardware.pulse_max_us {
            eyre::bail!("hardware.pulse_min_us must be < hardware.pulse_max_us");
        }
        if self.hardware.period_ms == 0 {
            eyre::bail!("hardware.period_ms must be >= 1");
        }
        if u64::from(self.hardware.pulse_max_us) > self.hardware.period_ms.saturating_mul(1000) {
            eyre::bail!("hardware.pulse_max_us must fit inside hardware.period_ms");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
