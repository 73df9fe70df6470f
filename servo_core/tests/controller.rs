use std::time::Duration;

use rstest::rstest;
use servo_core::mocks::RecordingSink;
use servo_core::{ActuatorCfg, MotionCfg, MotionController, ServoError, build_controller};
use servo_hardware::{ServoEvent, SimProbe, SimulatedServo};
use servo_traits::clock::test_clock::TestClock;

struct Rig {
    ctl: MotionController<SimulatedServo, RecordingSink>,
    probe: SimProbe,
    sink: RecordingSink,
    clock: TestClock,
}

fn rig(actuator: ActuatorCfg) -> Rig {
    let servo = SimulatedServo::new();
    let probe = servo.probe();
    let sink = RecordingSink::new();
    let clock = TestClock::new();
    let ctl = build_controller(
        "servo1",
        servo,
        sink.clone(),
        actuator,
        None,
        Some(Box::new(clock.clone())),
    )
    .expect("build controller");
    Rig {
        ctl,
        probe,
        sink,
        clock,
    }
}

fn actuator(starting_level: i32) -> ActuatorCfg {
    ActuatorCfg {
        pin: 9,
        starting_level,
        ..ActuatorCfg::default()
    }
}

#[test]
fn worked_example_from_mid_to_full() {
    let mut r = rig(actuator(50));
    assert_eq!(r.ctl.target_angle(), 90);

    r.ctl.init().expect("init");
    assert_eq!(r.sink.last().as_deref(), Some("servo1 50:90:1"));

    r.probe.clear();
    r.clock.clear_sleeps();
    r.ctl.be_smart(100, 2).expect("move");

    assert_eq!(r.ctl.old_angle(), 90);
    assert_eq!(r.ctl.target_angle(), 180);
    assert_eq!(r.ctl.current_angle(), 180);
    let writes = r.probe.writes();
    assert_eq!(writes.len(), 90);
    assert_eq!(writes.first(), Some(&91));
    assert_eq!(writes.last(), Some(&180));
    let sleeps = r.clock.sleeps();
    assert_eq!(sleeps.len(), 90);
    assert!(sleeps.iter().all(|d| *d == Duration::from_millis(11)));
    assert_eq!(r.sink.last().as_deref(), Some("servo1 100:180:2"));
}

#[test]
fn init_at_rest_writes_once_and_settles() {
    let mut r = rig(actuator(50));
    r.ctl.init().expect("init");
    assert_eq!(
        r.probe.events(),
        vec![ServoEvent::Attach(9), ServoEvent::Write(90)]
    );
    assert_eq!(r.clock.sleeps(), vec![Duration::from_secs(1)]);
}

#[test]
fn zero_distance_command_is_a_single_write() {
    let mut r = rig(actuator(25));
    r.ctl.init().expect("init");
    r.probe.clear();
    r.clock.clear_sleeps();

    r.ctl.be_smart(25, 9).expect("same level");
    assert_eq!(r.probe.writes(), vec![45]);
    assert_eq!(r.clock.sleeps(), vec![Duration::from_secs(1)]);
}

#[test]
fn every_step_is_one_degree_toward_target() {
    let mut r = rig(actuator(80));
    r.ctl.init().expect("init");
    r.probe.clear();

    r.ctl.be_smart(10, 1).expect("move down");
    let writes = r.probe.writes();
    assert_eq!(writes.len(), (144 - 18) as usize);
    let mut prev = 144i32;
    for w in writes {
        assert_eq!(prev - i32::from(w), 1);
        prev = i32::from(w);
    }
    assert_eq!(prev, 18);
}

#[test]
fn moves_chain_from_previous_target() {
    let mut r = rig(actuator(0));
    r.ctl.init().expect("init");

    r.ctl.be_smart(50, 1).expect("first");
    assert_eq!(r.ctl.old_angle(), 0);
    assert_eq!(r.ctl.target_angle(), 90);

    r.probe.clear();
    r.ctl.be_smart(40, 1).expect("second");
    assert_eq!(r.ctl.old_angle(), 90);
    assert_eq!(r.ctl.target_angle(), 72);
    assert_eq!(r.probe.writes().first(), Some(&89));
    assert_eq!(r.probe.writes().len(), 18);
}

#[test]
fn out_of_range_levels_are_clamped_before_writing() {
    let mut r = rig(actuator(50));
    r.ctl.init().expect("init");

    r.ctl.be_smart(250, 0).expect("over");
    assert_eq!(r.ctl.target_angle(), 180);
    assert_eq!(r.ctl.level(), 250);
    assert_eq!(r.sink.last().as_deref(), Some("servo1 250:180:0"));

    r.ctl.be_smart(-40, 0).expect("under");
    assert_eq!(r.ctl.target_angle(), 0);
    assert!(r.probe.writes().iter().all(|a| *a <= 180));
    assert_eq!(r.probe.angle(), Some(0));
}

#[test]
fn starting_level_beyond_range_starts_from_clamped_angle() {
    let mut r = rig(actuator(200));
    assert_eq!(r.ctl.target_angle(), 360);
    r.ctl.init().expect("init");
    // 360 clamps to 180 on both ends, so this is a hold
    assert_eq!(r.probe.writes(), vec![180]);
    assert_eq!(r.sink.last().as_deref(), Some("servo1 200:180:1"));
}

#[rstest]
#[case(1, Duration::from_millis(5))]
#[case(2, Duration::from_millis(11))]
#[case(4, Duration::from_millis(22))]
#[case(3, Duration::from_millis(16))]
fn step_delay_scales_with_duration(#[case] duration_s: i32, #[case] expected: Duration) {
    let mut r = rig(actuator(0));
    r.ctl.init().expect("init");
    r.clock.clear_sleeps();
    r.ctl.be_smart(10, duration_s).expect("move");
    let sleeps = r.clock.sleeps();
    assert_eq!(sleeps.len(), 18);
    assert!(sleeps.iter().all(|d| *d == expected));
}

#[test]
fn full_sweep_takes_about_duration_over_correction() {
    let mut r = rig(actuator(0));
    r.ctl.init().expect("init");
    let before = r.clock.elapsed();
    r.ctl.be_smart(100, 10).expect("sweep");
    // 180 steps * floor(100 / 1.8) ms
    assert_eq!(r.clock.elapsed() - before, Duration::from_millis(180 * 55));
}

#[test]
fn custom_step_correction_is_honored() {
    let servo = SimulatedServo::new();
    let clock = TestClock::new();
    let mut ctl = build_controller(
        "servo1",
        servo,
        RecordingSink::new(),
        actuator(0),
        Some(MotionCfg {
            step_correction: 1.0,
            settle: Duration::from_millis(5),
        }),
        Some(Box::new(clock.clone())),
    )
    .unwrap();
    ctl.init().unwrap();
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(5)]);
    clock.clear_sleeps();
    ctl.be_smart(1, 3).unwrap();
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(30)]);
}

#[test]
fn detach_after_move_powers_down_after_the_last_write() {
    let mut r = rig(ActuatorCfg {
        detach_after_move: true,
        ..actuator(50)
    });
    r.ctl.init().expect("init");
    assert!(!r.ctl.is_attached());

    r.probe.clear();
    r.ctl.be_smart(52, 1).expect("move");
    assert_eq!(
        r.probe.events(),
        vec![
            ServoEvent::Attach(9),
            ServoEvent::Write(91),
            ServoEvent::Write(92),
            ServoEvent::Write(93),
            ServoEvent::Detach,
        ]
    );
    assert!(!r.probe.is_attached());
}

#[test]
fn without_detach_servo_stays_attached() {
    let mut r = rig(actuator(50));
    r.ctl.init().expect("init");
    r.ctl.be_smart(60, 1).expect("move");
    r.ctl.be_smart(70, 1).expect("move");
    assert!(r.ctl.is_attached());
    let attaches = r
        .probe
        .events()
        .into_iter()
        .filter(|e| matches!(e, ServoEvent::Attach(_)))
        .count();
    assert_eq!(attaches, 1);
    assert!(!r.probe.events().contains(&ServoEvent::Detach));
}

#[test]
fn inverted_mapping_moves_the_other_way() {
    let mut r = rig(ActuatorCfg {
        zero_level_angle: 180,
        full_level_angle: 0,
        ..actuator(0)
    });
    r.ctl.init().expect("init");
    assert_eq!(r.ctl.target_angle(), 180);
    r.probe.clear();
    r.ctl.be_smart(100, 0).expect("move");
    assert_eq!(r.probe.writes().first(), Some(&179));
    assert_eq!(r.probe.writes().last(), Some(&0));
}

#[test]
fn handle_command_parses_and_moves() {
    let mut r = rig(actuator(50));
    r.ctl.init().expect("init");
    r.ctl.handle_command("servo1 75:3").expect("command");
    assert_eq!(r.ctl.level(), 75);
    assert_eq!(r.ctl.duration(), 3);
    assert_eq!(r.ctl.target_angle(), 135);
    assert_eq!(r.sink.last().as_deref(), Some("servo1 75:135:3"));

    r.ctl.handle_command("servo1 junk:junk").expect("parse-or-zero");
    assert_eq!(r.sink.last().as_deref(), Some("servo1 0:0:0"));
}

#[test]
fn refresh_is_idempotent() {
    let mut r = rig(actuator(30));
    r.ctl.refresh();
    r.ctl.refresh();
    assert_eq!(
        r.sink.messages(),
        vec!["servo1 30:54:1".to_string(), "servo1 30:54:1".to_string()]
    );
    assert!(r.probe.events().is_empty());
    assert_eq!(r.ctl.target_angle(), 54);
}

#[test]
fn sub_second_move_time_truncates_to_zero() {
    let r = rig(ActuatorCfg {
        move_time_ms: 750,
        ..actuator(50)
    });
    assert_eq!(r.ctl.duration(), 0);
    assert_eq!(r.ctl.report().to_string(), "servo1 50:90:0");
}

#[test]
fn attach_failure_skips_writes_but_still_reports() {
    let servo = SimulatedServo::failing_attach();
    let probe = servo.probe();
    let sink = RecordingSink::new();
    let mut ctl = build_controller(
        "servo1",
        servo,
        sink.clone(),
        actuator(50),
        None,
        Some(Box::new(TestClock::new())),
    )
    .unwrap();

    let err = ctl.be_smart(80, 1).expect_err("attach must fail");
    match err.downcast_ref::<ServoError>() {
        Some(ServoError::Attach(_)) => {}
        other => panic!("expected Attach error, got {other:?}"),
    }
    assert!(probe.writes().is_empty());
    assert_eq!(ctl.target_angle(), 144);
    // the servo never moved
    assert_eq!(ctl.current_angle(), 90);
    assert_eq!(sink.last().as_deref(), Some("servo1 80:144:1"));
}
