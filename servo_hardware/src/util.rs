use std::time::Duration;

/// Default shortest pulse (0 degrees), matching common hobby-servo drivers.
pub const DEFAULT_PULSE_MIN_US: u32 = 544;
/// Default longest pulse (180 degrees).
pub const DEFAULT_PULSE_MAX_US: u32 = 2400;
/// Standard 50 Hz servo frame.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(20);

/// Highest angle a servo accepts.
pub const MAX_ANGLE_DEG: u8 = 180;

/// Linear angle to pulse-width conversion over `[min_us, max_us]`.
///
/// Angles above 180 are treated as 180. Integer math truncates toward the
/// lower pulse width.
pub fn angle_to_pulse_us(angle_deg: u8, min_us: u32, max_us: u32) -> u32 {
    let angle = u32::from(angle_deg.min(MAX_ANGLE_DEG));
    let span = max_us.saturating_sub(min_us);
    min_us + angle * span / u32::from(MAX_ANGLE_DEG)
}

/// Same as [`angle_to_pulse_us`], as a `Duration` ready for a PWM driver.
pub fn angle_to_pulse(angle_deg: u8, min_us: u32, max_us: u32) -> Duration {
    Duration::from_micros(u64::from(angle_to_pulse_us(angle_deg, min_us, max_us)))
}
