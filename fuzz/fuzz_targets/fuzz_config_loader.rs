#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validate arbitrary TOML; errors are fine, panics are not.
    if let Ok(cfg) = servo_config::load_toml(data) {
        let valid = cfg.validate().is_ok();
        if valid {
            // A valid config always converts into core settings
            let actuator: servo_core::ActuatorCfg = (&cfg.servo).into();
            let motion: servo_core::MotionCfg = (&cfg.motion).into();
            assert!(motion.step_correction > 0.0);
            let _ = servo_core::mapping::level_to_angle(
                actuator.starting_level,
                actuator.zero_level_angle,
                actuator.full_level_angle,
            );
        }
    }
});
