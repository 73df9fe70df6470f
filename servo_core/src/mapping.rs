//! Level-space to angle-space mapping.
//!
//! All arithmetic is integer and division truncates toward zero
//! (level 51 over 0..=180 is 91.8, written as 91).

/// Lowest logical level of the upstream control system.
pub const LEVEL_MIN: i32 = 0;
/// Highest logical level of the upstream control system.
pub const LEVEL_MAX: i32 = 100;

/// Lowest angle ever written to the servo.
pub const ANGLE_MIN: i32 = 0;
/// Highest angle ever written to the servo.
pub const ANGLE_MAX: i32 = 180;

/// Linear re-scale of `x` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// Inputs outside the source range extrapolate. Uses 64-bit intermediates and
/// saturates the result to `i32`. A degenerate source range returns `out_min`.
#[inline]
pub fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let span_in = i64::from(in_max) - i64::from(in_min);
    if span_in == 0 {
        return out_min;
    }
    let span_out = i64::from(out_max) - i64::from(out_min);
    let scaled = (i64::from(x) - i64::from(in_min)) * span_out / span_in + i64::from(out_min);
    scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Angle for `level`, given the angles that level 0 and level 100 map to.
///
/// The result is not clamped; callers clamp with [`clamp_angle`] before use.
#[inline]
pub fn level_to_angle(level: i32, zero_level_angle: i32, full_level_angle: i32) -> i32 {
    map_range(
        level,
        LEVEL_MIN,
        LEVEL_MAX,
        zero_level_angle,
        full_level_angle,
    )
}

/// Clamp an angle into the servo's physical range.
#[inline]
pub fn clamp_angle(angle: i32) -> i32 {
    angle.clamp(ANGLE_MIN, ANGLE_MAX)
}

/// Whole seconds in `ms`, truncating (999 ms → 0 s).
#[inline]
pub fn ms_to_whole_secs(ms: i32) -> i32 {
    ms / 1000
}
