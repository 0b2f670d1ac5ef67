//! FFprobe-based duration probing.

use crate::cmd::{run_with_timeout, CommandRun};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Probe a media file's container duration in seconds using ffprobe.
///
/// Fails with [`Error::MediaUnreadable`] if the file is missing, the probe
/// exceeds `timeout`, ffprobe rejects the container, or the container does
/// not report a positive duration.
pub fn probe_duration_with_ffprobe(
    ffprobe_bin: &Path,
    path: &Path,
    timeout: Duration,
) -> Result<f64> {
    if !path.exists() {
        return Err(Error::media_unreadable(path, "file does not exist"));
    }

    let mut cmd = Command::new(ffprobe_bin);
    cmd.args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path);

    let output = match run_with_timeout(&mut cmd, timeout)? {
        CommandRun::Finished(output) => output,
        CommandRun::TimedOut => {
            return Err(Error::media_unreadable(
                path,
                format!("ffprobe timed out after {:?}", timeout),
            ));
        }
    };

    if !output.status.success() {
        return Err(Error::media_unreadable(path, output.stderr_text()));
    }

    let json_str = String::from_utf8(output.stdout)
        .map_err(|e| Error::media_unreadable(path, format!("invalid UTF-8: {}", e)))?;
    let ff_output: FfprobeOutput = serde_json::from_str(&json_str)?;

    parse_duration(path, &ff_output)
}

fn parse_duration(path: &Path, output: &FfprobeOutput) -> Result<f64> {
    let duration = output
        .format
        .duration
        .as_deref()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| Error::media_unreadable(path, "container reports no duration"))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(Error::media_unreadable(
            path,
            format!("container reports invalid duration {}", duration),
        ));
    }

    Ok(duration)
}
