//! The motion controller (`MotionController`).
//!
//! Owns the motion state and the servo handle, maps levels to angles, and
//! drives each move as a blocking sequence of one-degree steps.

use std::sync::Arc;

use servo_traits::clock::Clock;
use servo_traits::{Servo, StateSink};

use crate::command::Command;
use crate::config::{ActuatorCfg, MotionCfg};
use crate::error::Result;
use crate::hw_error::{map_attach_error, map_hw_error};
use crate::mapping::{clamp_angle, level_to_angle, ms_to_whole_secs};
use crate::motion::MotionPlan;
use crate::report::StateReport;

/// Single-actuator motion controller, generic over the servo and report sink.
pub struct MotionController<S: Servo, K: StateSink> {
    pub(crate) name: String,
    pub(crate) actuator: ActuatorCfg,
    pub(crate) motion: MotionCfg,
    pub(crate) servo: S,
    pub(crate) sink: K,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,

    pub(crate) current_level: i32,
    pub(crate) old_angle: i32,
    pub(crate) target_angle: i32,
    pub(crate) current_angle: i32,
    pub(crate) current_duration: i32,
}

impl<S: Servo, K: StateSink> core::fmt::Debug for MotionController<S, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MotionController")
            .field("name", &self.name)
            .field("pin", &self.actuator.pin)
            .field("level", &self.current_level)
            .field("old_angle", &self.old_angle)
            .field("target_angle", &self.target_angle)
            .field("duration_s", &self.current_duration)
            .finish()
    }
}

impl<S: Servo, K: StateSink> MotionController<S, K> {
    pub(crate) fn new(
        name: String,
        actuator: ActuatorCfg,
        motion: MotionCfg,
        servo: S,
        sink: K,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let target_angle = level_to_angle(
            actuator.starting_level,
            actuator.zero_level_angle,
            actuator.full_level_angle,
        );
        Self {
            current_level: actuator.starting_level,
            current_duration: ms_to_whole_secs(actuator.move_time_ms),
            old_angle: target_angle,
            target_angle,
            current_angle: target_angle,
            name,
            actuator,
            motion,
            servo,
            sink,
            clock,
        }
    }

    /// Move to the starting angle and report. Call once at startup.
    pub fn init(&mut self) -> Result<()> {
        let moved = self.run_motion_cycle();
        self.refresh();
        moved
    }

    /// Accept a new level/duration, move there, and report.
    ///
    /// The new move starts from the previous target. Neither argument is
    /// range-checked; only the resulting angle is clamped. Returns an error
    /// only when the servo could not be attached, in which case nothing was
    /// written but the state was still updated and reported.
    pub fn be_smart(&mut self, level: i32, duration_s: i32) -> Result<()> {
        self.current_level = level;
        self.current_duration = duration_s;
        self.old_angle = self.target_angle;
        self.target_angle = level_to_angle(
            level,
            self.actuator.zero_level_angle,
            self.actuator.full_level_angle,
        );
        tracing::debug!(
            name = %self.name,
            level,
            duration_s,
            old_angle = self.old_angle,
            target_angle = self.target_angle,
            "command accepted"
        );
        let moved = self.run_motion_cycle();
        self.refresh();
        moved
    }

    /// Decode a raw `"<prefix> <level>:<duration>"` string and run it.
    pub fn handle_command(&mut self, raw: &str) -> Result<()> {
        let cmd = Command::parse(raw);
        tracing::debug!(
            name = %self.name,
            raw,
            level = cmd.level,
            duration_s = cmd.duration_s,
            "command parsed"
        );
        self.be_smart(cmd.level, cmd.duration_s)
    }

    /// Send the current state upstream. Does not touch motion state.
    pub fn refresh(&mut self) {
        let line = self.report().to_string();
        self.sink.send(&line);
    }

    /// Current state as a structured report.
    pub fn report(&self) -> StateReport {
        StateReport {
            name: self.name.clone(),
            level: self.current_level,
            target_angle: self.target_angle,
            duration_s: self.current_duration,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn pin(&self) -> u8 {
        self.actuator.pin
    }
    pub fn target_angle(&self) -> i32 {
        self.target_angle
    }
    pub fn level(&self) -> i32 {
        self.current_level
    }
    pub fn duration(&self) -> i32 {
        self.current_duration
    }
    pub fn old_angle(&self) -> i32 {
        self.old_angle
    }
    /// Last angle written to the servo. Equals `target_angle` after a
    /// completed move; after a failed attach nothing was written, so it keeps
    /// the previous position while `target_angle` already holds the new one.
    pub fn current_angle(&self) -> i32 {
        self.current_angle
    }
    pub fn detach_after_move(&self) -> bool {
        self.actuator.detach_after_move
    }
    pub fn is_attached(&self) -> bool {
        self.servo.is_attached()
    }
    pub fn motion_cfg(&self) -> &MotionCfg {
        &self.motion
    }

    /// Plan for moving from `old_angle` to `target_angle` at the current duration.
    pub fn plan(&self) -> MotionPlan {
        MotionPlan::new(
            self.old_angle,
            self.target_angle,
            self.current_duration,
            &self.motion,
        )
    }

    /// One blocking move from `old_angle` to `target_angle`.
    fn run_motion_cycle(&mut self) -> Result<()> {
        let span = tracing::debug_span!("servo", name = %self.name, pin = self.actuator.pin);
        let _enter = span.enter();
        self.target_angle = clamp_angle(self.target_angle);

        if !self.servo.is_attached()
            && let Err(e) = self.servo.attach(self.actuator.pin)
        {
            let err = map_attach_error(&*e);
            tracing::error!(error = %err, "servo attach failed; move skipped");
            return Err(err.into());
        }

        let plan = self.plan();

        if plan.is_hold() {
            self.current_angle = plan.target();
            self.write_angle(plan.target() as u8);
            self.clock.sleep(plan.settle());
        } else {
            tracing::debug!(
                from = plan.start(),
                to = plan.target(),
                steps = plan.steps(),
                step_ms = plan.step_delay().as_millis() as u64,
                "stepping"
            );
            for angle in plan.angles() {
                self.current_angle = i32::from(angle);
                self.write_angle(angle);
                self.clock.sleep(plan.step_delay());
            }
        }

        tracing::debug!(angle = self.target_angle, "servo motor angle set");

        if self.actuator.detach_after_move
            && let Err(e) = self.servo.detach()
        {
            tracing::warn!(error = %map_hw_error(&*e), "servo detach failed");
        }
        Ok(())
    }

    /// Best-effort write; failures are logged and the move carries on.
    fn write_angle(&mut self, angle: u8) {
        tracing::trace!(angle, "write");
        if let Err(e) = self.servo.write(angle) {
            tracing::warn!(angle, error = %map_hw_error(&*e), "servo write failed");
        }
    }
}
