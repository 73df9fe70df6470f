//! Servo assembly and command execution.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{SystemTime, UNIX_EPOCH};

use servo_config::Config;
use servo_core::hw_error::{map_attach_error, map_hw_error};
use servo_core::runner::{RunSummary, run_lines};
use servo_core::{ActuatorCfg, MotionCfg, ServoDriver, StateReport};
use servo_traits::{Servo, StateSink};

use crate::cli::json_mode;

/// Prints each report as a plain line on stdout.
pub struct StdoutSink;

impl StateSink for StdoutSink {
    fn send(&mut self, message: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{message}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "stdout write failed");
        }
    }
}

/// Prints each report as one JSON object per line on stdout.
pub struct JsonSink;

impl StateSink for JsonSink {
    fn send(&mut self, message: &str) {
        let line = match message.parse::<StateReport>() {
            Ok(report) => report_json(&report),
            Err(e) => {
                tracing::warn!(error = %e, "report not in name level:angle:duration form");
                serde_json::json!({ "timestamp": now_ms(), "raw": message }).to_string()
            }
        };
        StdoutSink.send(&line);
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

pub fn report_json(report: &StateReport) -> String {
    serde_json::json!({
        "timestamp": now_ms(),
        "name": report.name,
        "level": report.level,
        "target_angle": report.target_angle,
        "duration_s": report.duration_s,
    })
    .to_string()
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub fn make_servo(cfg: &Config) -> eyre::Result<Box<dyn Servo + Send>> {
    let servo = servo_hardware::hardware::GpioServo::new(
        cfg.hardware.pulse_min_us,
        cfg.hardware.pulse_max_us,
        std::time::Duration::from_millis(cfg.hardware.period_ms),
    )
    .map_err(|e| eyre::eyre!("open gpio: {e}"))?;
    tracing::info!(pin = cfg.servo.pin, "using GPIO servo");
    Ok(Box::new(servo))
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
pub fn make_servo(_cfg: &Config) -> eyre::Result<Box<dyn Servo + Send>> {
    // Test hook: a simulated servo whose attach always fails
    if std::env::var("SERVO_TEST_SIM_ATTACH_FAIL").is_ok_and(|v| v == "1") {
        tracing::warn!("simulated servo set to fail attach");
        return Ok(Box::new(servo_hardware::SimulatedServo::failing_attach()));
    }
    Ok(Box::new(servo_hardware::SimulatedServo::new()))
}

/// Assemble a driver from config with the sink matching the output mode.
pub fn build_driver(cfg: &Config) -> eyre::Result<ServoDriver> {
    let sink: Box<dyn StateSink + Send> = if json_mode() {
        Box::new(JsonSink)
    } else {
        Box::new(StdoutSink)
    };
    let actuator: ActuatorCfg = (&cfg.servo).into();
    let motion: MotionCfg = (&cfg.motion).into();
    ServoDriver::builder()
        .with_servo(make_servo(cfg)?)
        .with_sink(sink)
        .with_name(cfg.servo.name.clone())
        .with_actuator(actuator)
        .with_motion(motion)
        .build()
}

pub fn run_init(cfg: &Config) -> eyre::Result<()> {
    let mut driver = build_driver(cfg)?;
    driver.init()
}

pub fn run_move(cfg: &Config, level: i32, duration: Option<i32>) -> eyre::Result<()> {
    let mut driver = build_driver(cfg)?;
    driver.init()?;
    let duration = duration.unwrap_or_else(|| driver.duration());
    tracing::info!(level, duration_s = duration, "move");
    driver.be_smart(level, duration)
}

pub fn run_send(cfg: &Config, command: &str) -> eyre::Result<()> {
    let mut driver = build_driver(cfg)?;
    driver.init()?;
    driver.handle_command(command)
}

/// Handle stdin lines until EOF or until `shutdown` is set.
pub fn run_stdin(cfg: &Config, shutdown: &Arc<AtomicBool>) -> eyre::Result<RunSummary> {
    let mut driver = build_driver(cfg)?;
    driver.init()?;
    let stdin = std::io::BufReader::new(std::io::stdin());
    let summary = run_lines(&mut driver, stdin, shutdown)?;
    tracing::info!(
        commands = summary.commands,
        failures = summary.failures,
        interrupted = summary.interrupted,
        "command loop finished"
    );
    Ok(summary)
}

pub fn self_check(cfg: &Config) -> eyre::Result<()> {
    let mut servo = make_servo(cfg)?;
    let pin = cfg.servo.pin;
    servo
        .attach(pin)
        .map_err(|e| eyre::Report::new(map_attach_error(&*e)))?;
    let attached = servo.is_attached();
    servo
        .detach()
        .map_err(|e| eyre::Report::new(map_hw_error(&*e)))?;
    if !attached {
        eyre::bail!("servo on pin {pin} did not report attached");
    }
    tracing::info!(pin, "self-check passed");
    Ok(())
}
