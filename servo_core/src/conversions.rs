//! `From` implementations bridging `servo_config` types to `servo_core` types.

use std::time::Duration;

use crate::config::{ActuatorCfg, MotionCfg};

// ── ActuatorCfg ──────────────────────────────────────────────────────────────

impl From<&servo_config::ServoSection> for ActuatorCfg {
    fn from(c: &servo_config::ServoSection) -> Self {
        Self {
            pin: c.pin,
            starting_level: c.starting_level,
            detach_after_move: c.detach_after_move,
            move_time_ms: c.move_time_ms,
            zero_level_angle: c.zero_level_angle,
            full_level_angle: c.full_level_angle,
        }
    }
}

// ── MotionCfg ────────────────────────────────────────────────────────────────

impl From<&servo_config::MotionSection> for MotionCfg {
    fn from(c: &servo_config::MotionSection) -> Self {
        Self {
            step_correction: c.step_correction,
            settle: Duration::from_millis(c.settle_ms),
        }
    }
}
