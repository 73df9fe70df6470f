pub mod error;
pub mod util;

use servo_traits::Servo;
use std::sync::{Arc, Mutex};

use crate::error::HwError;

/// Observable effect of a call on [`SimulatedServo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoEvent {
    Attach(u8),
    Detach,
    Write(u8),
}

#[derive(Debug, Default)]
struct SimState {
    attached_pin: Option<u8>,
    angle: Option<u8>,
    fail_attach: bool,
    events: Vec<ServoEvent>,
}

/// Simulated servo implementation.
///
/// Rejects writes while detached and angles above 180, so a misbehaving
/// controller surfaces as an error instead of silently passing.
#[derive(Debug, Default)]
pub struct SimulatedServo {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedServo {
    pub fn new() -> Self {
        Self::default()
    }

    /// A servo whose `attach` always fails (exercises the attach error path).
    pub fn failing_attach() -> Self {
        let servo = Self::default();
        if let Ok(mut st) = servo.state.lock() {
            st.fail_attach = true;
        }
        servo
    }

    /// Read-only handle that stays valid after the servo is moved into a controller.
    pub fn probe(&self) -> SimProbe {
        SimProbe {
            state: Arc::clone(&self.state),
        }
    }
}

impl Servo for SimulatedServo {
    fn attach(&mut self, pin: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut st = self
            .state
            .lock()
            .map_err(|_| HwError::Gpio("simulated servo state poisoned".into()))?;
        if st.fail_attach {
            return Err(HwError::AttachFailed { pin }.into());
        }
        st.attached_pin = Some(pin);
        st.events.push(ServoEvent::Attach(pin));
        tracing::trace!(pin, "servo attached (simulated)");
        Ok(())
    }

    fn detach(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut st = self
            .state
            .lock()
            .map_err(|_| HwError::Gpio("simulated servo state poisoned".into()))?;
        st.attached_pin = None;
        st.events.push(ServoEvent::Detach);
        tracing::trace!("servo detached (simulated)");
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.state
            .lock()
            .map(|st| st.attached_pin.is_some())
            .unwrap_or(false)
    }

    fn write(&mut self, angle_deg: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut st = self
            .state
            .lock()
            .map_err(|_| HwError::Gpio("simulated servo state poisoned".into()))?;
        if st.attached_pin.is_none() {
            return Err(HwError::NotAttached.into());
        }
        if angle_deg > util::MAX_ANGLE_DEG {
            return Err(HwError::AngleOutOfRange(angle_deg).into());
        }
        st.angle = Some(angle_deg);
        st.events.push(ServoEvent::Write(angle_deg));
        tracing::trace!(angle = angle_deg, "servo write (simulated)");
        Ok(())
    }
}

/// Shared view into a [`SimulatedServo`].
#[derive(Debug, Clone)]
pub struct SimProbe {
    state: Arc<Mutex<SimState>>,
}

impl SimProbe {
    /// Every attach/detach/write in call order.
    pub fn events(&self) -> Vec<ServoEvent> {
        self.state
            .lock()
            .map(|st| st.events.clone())
            .unwrap_or_default()
    }

    /// Only the written angles, in call order.
    pub fn writes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ServoEvent::Write(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    pub fn is_attached(&self) -> bool {
        self.state
            .lock()
            .map(|st| st.attached_pin.is_some())
            .unwrap_or(false)
    }

    /// Last angle written, if any.
    pub fn angle(&self) -> Option<u8> {
        self.state.lock().ok().and_then(|st| st.angle)
    }

    /// Drop the recorded history; attachment and angle are kept.
    pub fn clear(&self) {
        if let Ok(mut st) = self.state.lock() {
            st.events.clear();
        }
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod hardware {
    use rppal::gpio::{Gpio, OutputPin};
    use servo_traits::Servo;
    use std::time::Duration;

    use crate::error::{HwError, Result};
    use crate::util::angle_to_pulse;

    /// Servo driven by software PWM on a Raspberry Pi GPIO pin.
    pub struct GpioServo {
        gpio: Gpio,
        out: Option<OutputPin>,
        pulse_min_us: u32,
        pulse_max_us: u32,
        period: Duration,
    }

    impl GpioServo {
        pub fn new(pulse_min_us: u32, pulse_max_us: u32, period: Duration) -> Result<Self> {
            let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
            Ok(Self {
                gpio,
                out: None,
                pulse_min_us,
                pulse_max_us,
                period,
            })
        }
    }

    impl Servo for GpioServo {
        fn attach(&mut self, pin: u8) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
            let out = self
                .gpio
                .get(pin)
                .map_err(|e| {
                    tracing::error!(pin, error = %e, "open servo pin");
                    HwError::AttachFailed { pin }
                })?
                .into_output_low();
            self.out = Some(out);
            tracing::debug!(pin, "servo attached");
            Ok(())
        }

        fn detach(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if let Some(mut out) = self.out.take() {
                out.clear_pwm().map_err(|e| HwError::Gpio(e.to_string()))?;
                out.set_low();
                tracing::debug!("servo detached");
            }
            Ok(())
        }

        fn is_attached(&self) -> bool {
            self.out.is_some()
        }

        fn write(&mut self, angle_deg: u8) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
            let out = self.out.as_mut().ok_or(HwError::NotAttached)?;
            let pulse = angle_to_pulse(angle_deg, self.pulse_min_us, self.pulse_max_us);
            out.set_pwm(self.period, pulse)
                .map_err(|e| HwError::Gpio(e.to_string()))?;
            tracing::trace!(angle = angle_deg, pulse_us = pulse.as_micros() as u64, "servo pwm");
            Ok(())
        }
    }
}
