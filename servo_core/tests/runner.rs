use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use servo_core::mocks::RecordingSink;
use servo_core::runner::{RunSummary, run_lines};
use servo_core::{ActuatorCfg, build_controller};
use servo_hardware::SimulatedServo;
use servo_traits::clock::test_clock::TestClock;

#[test]
fn dispatches_each_line_and_skips_comments() {
    let sink = RecordingSink::new();
    let mut ctl = build_controller(
        "servo1",
        SimulatedServo::new(),
        sink.clone(),
        ActuatorCfg::default(),
        None,
        Some(Box::new(TestClock::new())),
    )
    .unwrap();
    let input = "servo1 100:2\n\n# park\nservo1 0:1\n   \nservo1 x:y\n";
    let shutdown = AtomicBool::new(false);

    let summary = run_lines(&mut ctl, Cursor::new(input), &shutdown).expect("run");
    assert_eq!(
        summary,
        RunSummary {
            commands: 3,
            failures: 0,
            interrupted: false
        }
    );
    assert_eq!(
        sink.messages(),
        vec!["servo1 100:180:2", "servo1 0:0:1", "servo1 0:0:0"]
    );
}

#[test]
fn shutdown_flag_stops_before_next_command() {
    let sink = RecordingSink::new();
    let mut ctl = build_controller(
        "servo1",
        SimulatedServo::new(),
        sink.clone(),
        ActuatorCfg::default(),
        None,
        Some(Box::new(TestClock::new())),
    )
    .unwrap();
    let shutdown = AtomicBool::new(true);
    let summary = run_lines(&mut ctl, Cursor::new("servo1 10:1\n"), &shutdown).unwrap();
    assert!(summary.interrupted);
    assert_eq!(summary.commands, 0);
    assert!(sink.messages().is_empty());
}

#[test]
fn attach_failures_are_counted_not_fatal() {
    let sink = RecordingSink::new();
    let mut ctl = build_controller(
        "servo1",
        SimulatedServo::failing_attach(),
        sink.clone(),
        ActuatorCfg::default(),
        None,
        Some(Box::new(TestClock::new())),
    )
    .unwrap();
    let shutdown = AtomicBool::new(false);
    let summary = run_lines(&mut ctl, Cursor::new("s 10:1\ns 20:1\n"), &shutdown).unwrap();
    assert_eq!(summary.commands, 2);
    assert_eq!(summary.failures, 2);
    assert_eq!(sink.messages().len(), 2);
}

/// Reader that blocks until its sender is dropped, like an idle terminal.
struct IdleInput(crossbeam_channel::Receiver<Vec<u8>>);

impl std::io::Read for IdleInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.0.recv() {
            Ok(bytes) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Err(_) => Ok(0),
        }
    }
}

#[test]
fn shutdown_interrupts_a_loop_waiting_for_input() {
    let sink = RecordingSink::new();
    let mut ctl = build_controller(
        "servo1",
        SimulatedServo::new(),
        sink.clone(),
        ActuatorCfg::default(),
        None,
        Some(Box::new(TestClock::new())),
    )
    .unwrap();
    let (input_tx, input_rx) = crossbeam_channel::unbounded::<Vec<u8>>();
    input_tx.send(b"servo1 20:0\n".to_vec()).unwrap();

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    let trigger = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        flag.store(true, Ordering::Relaxed);
    });

    let started = Instant::now();
    let reader = std::io::BufReader::new(IdleInput(input_rx));
    let summary = run_lines(&mut ctl, reader, &shutdown).unwrap();
    trigger.join().unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.commands, 1);
    assert_eq!(sink.messages(), vec!["servo1 20:36:0"]);
    assert!(started.elapsed() < Duration::from_secs(3));
    // input was never closed
    drop(input_tx);
}
