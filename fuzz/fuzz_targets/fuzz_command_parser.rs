#![no_main]
use libfuzzer_sys::fuzz_target;
use servo_core::mapping::{ANGLE_MAX, ANGLE_MIN, clamp_angle, level_to_angle};
use servo_core::{Command, MotionCfg, MotionPlan};

fuzz_target!(|data: (&str, i32, i32, i32)| {
    let (raw, old, zero, full) = data;
    // Parsing never fails and never panics, whatever the bytes
    let cmd = Command::parse(raw);

    let target = level_to_angle(cmd.level, zero, full);
    let plan = MotionPlan::new(old, target, cmd.duration_s, &MotionCfg::default());
    assert_eq!(plan.target(), clamp_angle(target));
    let mut steps = 0u32;
    for angle in plan.angles().take(400) {
        assert!((ANGLE_MIN..=ANGLE_MAX).contains(&i32::from(angle)));
        steps += 1;
    }
    assert_eq!(steps, plan.steps());
});
