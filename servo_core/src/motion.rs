//! Stepped motion planning.
//!
//! A move from `start` to `target` is a sequence of one-degree writes, each
//! followed by the same delay. The requested duration is calibrated to a full
//! 0..=100 level sweep, so shorter moves finish proportionally sooner.

use std::time::Duration;

use crate::config::MotionCfg;
use crate::mapping::clamp_angle;

/// Nominal delay per step in whole milliseconds: `duration_s * 1000 / 100`.
#[inline]
pub fn nominal_step_ms(duration_s: i32) -> i64 {
    i64::from(duration_s) * 1000 / 100
}

/// Per-step delay after applying the correction divisor.
///
/// Truncates to whole milliseconds. Negative durations yield no delay; a
/// non-positive or non-finite correction is ignored.
pub fn step_delay(duration_s: i32, step_correction: f64) -> Duration {
    let nominal = nominal_step_ms(duration_s);
    if nominal <= 0 {
        return Duration::ZERO;
    }
    let corrected = if step_correction.is_finite() && step_correction > 0.0 {
        nominal as f64 / step_correction
    } else {
        nominal as f64
    };
    Duration::from_millis(corrected as u64)
}

/// Everything the motion cycle needs to drive one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionPlan {
    start: i32,
    target: i32,
    step_delay: Duration,
    settle: Duration,
}

impl MotionPlan {
    /// Plan a move. Both endpoints are clamped into the servo range first.
    pub fn new(old_angle: i32, target_angle: i32, duration_s: i32, cfg: &MotionCfg) -> Self {
        Self {
            start: clamp_angle(old_angle),
            target: clamp_angle(target_angle),
            step_delay: step_delay(duration_s, cfg.step_correction),
            settle: cfg.settle,
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    /// True when there is no distance to travel; the cycle then writes once
    /// and holds for `settle`.
    pub fn is_hold(&self) -> bool {
        self.start == self.target
    }

    /// Number of one-degree steps.
    pub fn steps(&self) -> u32 {
        self.target.abs_diff(self.start)
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    /// Angles written by the stepping loop, excluding the start angle and
    /// ending exactly at the target. Empty for a hold.
    pub fn angles(&self) -> impl Iterator<Item = u8> + use<> {
        let start = self.start;
        let dir = if self.target >= self.start { 1 } else { -1 };
        (1..=self.steps() as i32).map(move |i| (start + dir * i) as u8)
    }

    /// Total blocking time of the move.
    pub fn total_time(&self) -> Duration {
        if self.is_hold() {
            self.settle
        } else {
            self.step_delay.saturating_mul(self.steps())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_delay_follows_duration() {
        assert_eq!(step_delay(2, 1.8), Duration::from_millis(11));
        assert_eq!(step_delay(1, 1.8), Duration::from_millis(5));
        assert_eq!(step_delay(10, 1.8), Duration::from_millis(55));
        assert_eq!(step_delay(10, 1.0), Duration::from_millis(100));
        assert_eq!(step_delay(0, 1.8), Duration::ZERO);
        assert_eq!(step_delay(-3, 1.8), Duration::ZERO);
    }

    #[test]
    fn bad_correction_is_ignored() {
        assert_eq!(step_delay(2, 0.0), Duration::from_millis(20));
        assert_eq!(step_delay(2, f64::NAN), Duration::from_millis(20));
    }

    #[test]
    fn downward_plan_steps_toward_target() {
        let plan = MotionPlan::new(93, 90, 1, &MotionCfg::default());
        assert!(!plan.is_hold());
        assert_eq!(plan.steps(), 3);
        assert_eq!(plan.angles().collect::<Vec<_>>(), vec![92, 91, 90]);
        assert_eq!(plan.total_time(), Duration::from_millis(15));
    }

    #[test]
    fn hold_plan_uses_settle() {
        let plan = MotionPlan::new(45, 45, 5, &MotionCfg::default());
        assert!(plan.is_hold());
        assert_eq!(plan.angles().count(), 0);
        assert_eq!(plan.total_time(), Duration::from_secs(1));
    }

    #[test]
    fn endpoints_are_clamped() {
        let plan = MotionPlan::new(360, -20, 1, &MotionCfg::default());
        assert_eq!((plan.start(), plan.target()), (180, 0));
        assert_eq!(plan.steps(), 180);
        assert_eq!(plan.angles().last(), Some(0));
    }
}
