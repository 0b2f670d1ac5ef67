//! Bounded execution of external commands.
//!
//! ffprobe and ffmpeg are invoked as child processes; a hung decoder must not
//! hang the caller, so every invocation runs under a deadline. The child's
//! stdout/stderr are drained on separate threads while the parent polls for
//! exit, and the child is killed once the deadline passes.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured output of a finished child process.
#[derive(Debug)]
pub(crate) struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Outcome of running a command under a deadline.
#[derive(Debug)]
pub(crate) enum CommandRun {
    Finished(CommandOutput),
    TimedOut,
}

fn drain(mut reader: impl Read + Send + 'static) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        buf
    })
}

/// Run a command, killing it if it has not exited within `timeout`.
///
/// Output pipes are drained concurrently so a chatty child cannot block on a
/// full pipe while the parent waits for it to exit.
pub(crate) fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> std::io::Result<CommandRun> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = drain(child.stdout.take().expect("stdout piped"));
    let stderr = drain(child.stderr.take().expect("stderr piped"));

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            let stdout = stdout.join().unwrap_or_default();
            let stderr = stderr.join().unwrap_or_default();
            return Ok(CommandRun::Finished(CommandOutput {
                status,
                stdout,
                stderr,
            }));
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            let _ = stdout.join();
            let _ = stderr.join();
            return Ok(CommandRun::TimedOut);
        }

        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_command_captures_output() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");

        match run_with_timeout(&mut cmd, Duration::from_secs(5)).unwrap() {
            CommandRun::Finished(output) => {
                assert!(output.status.success());
                assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
            }
            CommandRun::TimedOut => panic!("echo should not time out"),
        }
    }

    #[test]
    fn test_slow_command_times_out() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");

        let started = Instant::now();
        match run_with_timeout(&mut cmd, Duration::from_millis(150)).unwrap() {
            CommandRun::TimedOut => {
                assert!(started.elapsed() < Duration::from_secs(4));
            }
            CommandRun::Finished(_) => panic!("sleep 5 should have timed out"),
        }
    }

    #[test]
    fn test_missing_binary_is_io_error() {
        let mut cmd = Command::new("definitely-not-a-real-binary");
        assert!(run_with_timeout(&mut cmd, Duration::from_secs(1)).is_err());
    }
}
