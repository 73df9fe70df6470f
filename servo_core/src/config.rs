//! Configuration types for the motion controller.
//!
//! These are the runtime configuration structs used by `MotionController`.
//! They are separate from the TOML-deserialized config in `servo_config`.

use std::time::Duration;

/// Empirical divisor for the per-degree delay, measured on an ATmega2560
/// reference board. Other targets should override it via `MotionCfg`.
pub const DEFAULT_STEP_CORRECTION: f64 = 1.8;

/// Hold after a zero-distance move so the single write has time to land.
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(1);

/// Actuator wiring and level mapping. Immutable once the controller is built.
///
/// None of these are range-checked; the target angle is clamped at move time.
#[derive(Debug, Clone)]
pub struct ActuatorCfg {
    /// Output pin passed to `Servo::attach`.
    pub pin: u8,
    /// Level the controller starts at (nominally 0..=100).
    pub starting_level: i32,
    /// Power the servo down once each move completes.
    pub detach_after_move: bool,
    /// Default move time in milliseconds. Stored internally as whole seconds.
    pub move_time_ms: i32,
    /// Angle that level 0 maps to.
    pub zero_level_angle: i32,
    /// Angle that level 100 maps to. May be below `zero_level_angle`.
    pub full_level_angle: i32,
}

impl Default for ActuatorCfg {
    fn default() -> Self {
        Self {
            pin: 0,
            starting_level: 50,
            detach_after_move: false,
            move_time_ms: 1000,
            zero_level_angle: 0,
            full_level_angle: 180,
        }
    }
}

/// Timing knobs for the stepped motion cycle.
#[derive(Debug, Clone)]
pub struct MotionCfg {
    /// Divisor applied to the per-step delay. Must be finite and > 0.
    pub step_correction: f64,
    /// Hold after a zero-distance move.
    pub settle: Duration,
}

impl Default for MotionCfg {
    fn default() -> Self {
        Self {
            step_correction: DEFAULT_STEP_CORRECTION,
            settle: DEFAULT_SETTLE,
        }
    }
}
