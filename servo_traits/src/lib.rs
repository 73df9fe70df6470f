pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// PWM servo driver as seen by the motion controller.
///
/// Angles are whole degrees; callers keep them within 0..=180.
pub trait Servo {
    fn attach(&mut self, pin: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn detach(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn is_attached(&self) -> bool;
    fn write(&mut self, angle_deg: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: Servo + ?Sized> Servo for Box<T> {
    fn attach(&mut self, pin: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).attach(pin)
    }
    fn detach(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).detach()
    }
    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }
    fn write(&mut self, angle_deg: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).write(angle_deg)
    }
}

/// Upstream broadcast channel that receives state reports.
pub trait StateSink {
    fn send(&mut self, message: &str);
}

impl<T: StateSink + ?Sized> StateSink for Box<T> {
    fn send(&mut self, message: &str) {
        (**self).send(message);
    }
}
