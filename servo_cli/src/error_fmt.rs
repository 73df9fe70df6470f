//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use servo_core::error::{BuildError, ServoError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingServo => {
                "What happened: No servo was provided to the motion controller.\nLikely causes: The servo backend failed to initialize or was not wired into the builder.\nHow to fix: Ensure the servo is created successfully and passed via with_servo(...).".to_string()
            }
            BuildError::MissingSink => {
                "What happened: No report sink was provided to the motion controller.\nLikely causes: The builder was not given an output for state reports.\nHow to fix: Pass a sink via with_sink(...).".to_string()
            }
            BuildError::MissingName => {
                "What happened: The servo has no name.\nLikely causes: The builder was not given the report prefix.\nHow to fix: Set [servo].name in the config.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<ServoError>() {
        return match se {
            ServoError::Attach(detail) => format!(
                "What happened: The servo could not be attached ({detail}).\nLikely causes: Wrong [servo].pin, missing GPIO permissions, or the pin is in use.\nHow to fix: Check the pin number and wiring; ensure the process may access GPIO."
            ),
            ServoError::HardwareFault(detail) | ServoError::Hardware(detail) => format!(
                "What happened: Servo hardware reported an error ({detail}).\nLikely causes: Power or signal wiring, or a PWM setup problem.\nHow to fix: Check 5V/GND and the signal line, then re-run with --log-level=debug."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config <FILE> pointing at a readable TOML file. Original: {msg}"
        );
    }

    if lower.contains("parse config") {
        return format!(
            "What happened: The config file is not valid TOML for this tool.\nLikely causes: A typo, a missing [servo] section, or a value of the wrong type.\nHow to fix: Compare with etc/servo.toml. Original: {msg}"
        );
    }

    if lower.contains("open gpio") {
        return "What happened: Failed to initialize GPIO.\nLikely causes: Not running on a supported board or insufficient GPIO permissions.\nHow to fix: Run on the target board; ensure the process has permission to access GPIO.".to_string();
    }

    if lower.starts_with("servo.")
        || lower.starts_with("motion.")
        || lower.starts_with("hardware.")
        || lower.starts_with("logging.")
    {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: An out-of-range or malformed value.\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for attach failures, 1 for everything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use servo_core::error::ServoError;
    if let Some(ServoError::Attach(_)) = err.downcast_ref::<ServoError>() {
        return 3;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    use servo_core::error::{BuildError, ServoError};
    if let Some(se) = err.downcast_ref::<ServoError>() {
        return match se {
            ServoError::Attach(_) => "Attach",
            ServoError::Hardware(_) | ServoError::HardwareFault(_) => "Hardware",
            ServoError::WorkerStopped => "WorkerStopped",
            ServoError::Io(_) => "Io",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "Config";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
