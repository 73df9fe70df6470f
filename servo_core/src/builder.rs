//! Type-state builder for `ServoDriver` and generic `build_controller` constructor.
//!
//! The builder enforces at compile time that a servo, a sink and a name are
//! provided before `build()` is available. `try_build()` is always available
//! for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use servo_traits::clock::{Clock, MonotonicClock};
use servo_traits::{Servo, StateSink};

use crate::config::{ActuatorCfg, MotionCfg};
use crate::controller::MotionController;
use crate::error::{BuildError, Result};

/// Boxed servo handle used by the dynamic controller.
pub type BoxedServo = Box<dyn Servo + Send>;
/// Boxed report sink used by the dynamic controller.
pub type BoxedSink = Box<dyn StateSink + Send>;

/// Dynamically dispatched controller produced by [`ServoDriverBuilder`].
pub type ServoDriver = MotionController<BoxedServo, BoxedSink>;

impl ServoDriver {
    /// Start building a driver.
    pub fn builder() -> ServoDriverBuilder<Missing, Missing, Missing> {
        ServoDriverBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `ServoDriver`. All fields are validated on `build()`.
pub struct ServoDriverBuilder<S, K, N> {
    servo: Option<BoxedServo>,
    sink: Option<BoxedSink>,
    name: Option<String>,
    actuator: Option<ActuatorCfg>,
    motion: Option<MotionCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _s: PhantomData<S>,
    _k: PhantomData<K>,
    _n: PhantomData<N>,
}

impl Default for ServoDriverBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            servo: None,
            sink: None,
            name: None,
            actuator: None,
            motion: None,
            clock: None,
            _s: PhantomData,
            _k: PhantomData,
            _n: PhantomData,
        }
    }
}

/// Validate configuration and construct a `MotionController`.
///
/// Actuator numbers are intentionally left unchecked (the target angle is
/// clamped at move time). The name must be usable as the first report token
/// (same rules as `servo_config`), and the step correction must be positive.
fn validate_and_build<S: Servo, K: StateSink>(
    name: String,
    servo: S,
    sink: K,
    actuator: ActuatorCfg,
    motion: MotionCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<MotionController<S, K>> {
    if name.trim().is_empty() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "name must not be empty",
        )));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "name must not contain whitespace",
        )));
    }
    // ':' separates the report fields
    if name.contains(':') {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "name must not contain ':'",
        )));
    }
    if !motion.step_correction.is_finite() || motion.step_correction <= 0.0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "step_correction must be > 0",
        )));
    }

    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };

    Ok(MotionController::new(
        name, actuator, motion, servo, sink, clock,
    ))
}

impl<S, K, N> ServoDriverBuilder<S, K, N> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<ServoDriver> {
        let servo = self
            .servo
            .ok_or_else(|| eyre::Report::new(BuildError::MissingServo))?;
        let sink = self
            .sink
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSink))?;
        let name = self
            .name
            .ok_or_else(|| eyre::Report::new(BuildError::MissingName))?;

        validate_and_build(
            name,
            servo,
            sink,
            self.actuator.unwrap_or_default(),
            self.motion.unwrap_or_default(),
            self.clock,
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<S, K, N> ServoDriverBuilder<S, K, N> {
    pub fn with_actuator(mut self, actuator: ActuatorCfg) -> Self {
        self.actuator = Some(actuator);
        self
    }
    pub fn with_motion(mut self, motion: MotionCfg) -> Self {
        self.motion = Some(motion);
        self
    }
    pub fn with_pin(mut self, pin: u8) -> Self {
        let mut a = self.actuator.unwrap_or_default();
        a.pin = pin;
        self.actuator = Some(a);
        self
    }
    pub fn with_starting_level(mut self, level: i32) -> Self {
        let mut a = self.actuator.unwrap_or_default();
        a.starting_level = level;
        self.actuator = Some(a);
        self
    }
    pub fn with_detach_after_move(mut self, detach: bool) -> Self {
        let mut a = self.actuator.unwrap_or_default();
        a.detach_after_move = detach;
        self.actuator = Some(a);
        self
    }
    pub fn with_angles(mut self, zero_level_angle: i32, full_level_angle: i32) -> Self {
        let mut a = self.actuator.unwrap_or_default();
        a.zero_level_angle = zero_level_angle;
        a.full_level_angle = full_level_angle;
        self.actuator = Some(a);
        self
    }
    pub fn with_step_correction(mut self, step_correction: f64) -> Self {
        let mut m = self.motion.unwrap_or_default();
        m.step_correction = step_correction;
        self.motion = Some(m);
        self
    }
    /// Provide a custom clock implementation; defaults to `MonotonicClock` when not provided.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setters that advance type-state
impl<K, N> ServoDriverBuilder<Missing, K, N> {
    pub fn with_servo(self, servo: impl Servo + Send + 'static) -> ServoDriverBuilder<Set, K, N> {
        ServoDriverBuilder {
            servo: Some(Box::new(servo)),
            sink: self.sink,
            name: self.name,
            actuator: self.actuator,
            motion: self.motion,
            clock: self.clock,
            _s: PhantomData,
            _k: PhantomData,
            _n: PhantomData,
        }
    }
}

impl<S, N> ServoDriverBuilder<S, Missing, N> {
    pub fn with_sink(self, sink: impl StateSink + Send + 'static) -> ServoDriverBuilder<S, Set, N> {
        ServoDriverBuilder {
            servo: self.servo,
            sink: Some(Box::new(sink)),
            name: self.name,
            actuator: self.actuator,
            motion: self.motion,
            clock: self.clock,
            _s: PhantomData,
            _k: PhantomData,
            _n: PhantomData,
        }
    }
}

impl<S, K> ServoDriverBuilder<S, K, Missing> {
    pub fn with_name(self, name: impl Into<String>) -> ServoDriverBuilder<S, K, Set> {
        ServoDriverBuilder {
            servo: self.servo,
            sink: self.sink,
            name: Some(name.into()),
            actuator: self.actuator,
            motion: self.motion,
            clock: self.clock,
            _s: PhantomData,
            _k: PhantomData,
            _n: PhantomData,
        }
    }
}

impl ServoDriverBuilder<Set, Set, Set> {
    /// Validate and build the driver. Only available when servo, sink and name are set.
    pub fn build(self) -> Result<ServoDriver> {
        self.try_build()
    }
}

/// Build a generic, statically-dispatched controller from a concrete servo and sink.
///
/// Delegates to the shared `validate_and_build`.
pub fn build_controller<S, K>(
    name: impl Into<String>,
    servo: S,
    sink: K,
    actuator: ActuatorCfg,
    motion: Option<MotionCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<MotionController<S, K>>
where
    S: Servo,
    K: StateSink,
{
    validate_and_build(
        name.into(),
        servo,
        sink,
        actuator,
        motion.unwrap_or_default(),
        clock,
    )
}
