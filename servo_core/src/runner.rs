use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel as xch;
use servo_traits::{Servo, StateSink};

use crate::controller::MotionController;
use crate::error::{Result, ServoError};

/// How often the command loop wakes to check the shutdown flag while idle.
pub const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

/// Outcome of feeding a line source into a controller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands handed to the controller.
    pub commands: usize,
    /// Commands whose move could not run (attach failures).
    pub failures: usize,
    /// True when the shutdown flag ended the run early.
    pub interrupted: bool,
}

/// Read `reader` line by line on a helper thread.
///
/// The thread ends at EOF, on a read error (after forwarding it), or once the
/// receiver is dropped and the next line arrives. A thread blocked in `read`
/// is left behind, which is fine for stdin at process exit.
pub fn spawn_line_reader<R>(reader: R) -> xch::Receiver<std::io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = xch::bounded(16);
    std::thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
        tracing::trace!("line reader exiting");
    });
    rx
}

/// Dispatch every command line from `reader` to `controller`, in order.
///
/// Blank lines and `#` comments are skipped. `shutdown` is checked between
/// commands and every [`SHUTDOWN_POLL`] while waiting for input, never during
/// a move. A failed move is logged and counted; only read errors end the run
/// with an error.
pub fn run_lines<S, K, R>(
    controller: &mut MotionController<S, K>,
    reader: R,
    shutdown: &AtomicBool,
) -> Result<RunSummary>
where
    S: Servo,
    K: StateSink,
    R: BufRead + Send + 'static,
{
    let lines = spawn_line_reader(reader);
    let mut summary = RunSummary::default();
    loop {
        if shutdown.load(Ordering::Relaxed) {
            summary.interrupted = true;
            tracing::info!("shutdown requested; stopping command loop");
            break;
        }
        let line = match lines.recv_timeout(SHUTDOWN_POLL) {
            Ok(line) => line.map_err(|e| eyre::Report::new(ServoError::Io(e.to_string())))?,
            Err(xch::RecvTimeoutError::Timeout) => continue,
            // EOF
            Err(xch::RecvTimeoutError::Disconnected) => break,
        };
        let cmd = line.trim();
        if cmd.is_empty() || cmd.starts_with('#') {
            continue;
        }
        summary.commands += 1;
        if let Err(e) = controller.handle_command(cmd) {
            summary.failures += 1;
            tracing::warn!(error = %e, command = cmd, "command failed");
        }
    }
    Ok(summary)
}
