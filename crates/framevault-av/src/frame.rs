//! Single-frame extraction via ffmpeg.
//!
//! Frames are rendered with a two-stage seek: a coarse `-ss` before `-i`
//! jumps to the nearest keyframe, and a second `-ss` after `-i` decodes
//! precisely to the target offset. Output is a JPEG scaled and padded to a
//! fixed 16:9 canvas.

use crate::cmd::{run_with_timeout, CommandRun};
use crate::{Error, Result};
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tracing::debug;

/// Output frame dimensions.
pub const FRAME_WIDTH: u32 = 1280;
pub const FRAME_HEIGHT: u32 = 720;

/// Coarse-seek lead time before the target offset, in seconds.
const SEEK_MARGIN: f64 = 2.0;

/// Build the ffmpeg argument list for extracting one frame.
fn frame_args(input: &Path, offset_secs: f64, output: &Path) -> Vec<String> {
    let coarse = (offset_secs - SEEK_MARGIN).max(0.0);
    let fine = offset_secs - coarse;

    let filter = format!(
        "scale={FRAME_WIDTH}:{FRAME_HEIGHT}:force_original_aspect_ratio=decrease,\
         pad={FRAME_WIDTH}:{FRAME_HEIGHT}:(ow-iw)/2:(oh-ih)/2:black"
    );

    let mut args = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ];

    if coarse > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{coarse:.3}"));
    }

    args.push("-i".to_string());
    args.push(input.to_string_lossy().to_string());

    if fine > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{fine:.3}"));
    }

    args.extend([
        "-frames:v".to_string(),
        "1".to_string(),
        "-an".to_string(),
        "-sn".to_string(),
        "-vf".to_string(),
        filter,
        "-q:v".to_string(),
        "2".to_string(),
        "-y".to_string(),
        output.to_string_lossy().to_string(),
    ]);

    args
}

/// Extract the frame nearest `offset_secs` from `input` into `output`.
///
/// Fails with [`Error::FrameExtraction`] if ffmpeg rejects the offset, the
/// extraction exceeds `timeout`, or no output file is produced. A partially
/// written output file is removed before the error is returned.
pub fn extract_frame_with_ffmpeg(
    ffmpeg_bin: &Path,
    input: &Path,
    offset_secs: f64,
    output: &Path,
    timeout: Duration,
) -> Result<()> {
    debug!(
        input = %input.display(),
        offset_secs,
        output = %output.display(),
        "extracting frame"
    );

    let mut cmd = Command::new(ffmpeg_bin);
    cmd.args(frame_args(input, offset_secs, output));

    let run = run_with_timeout(&mut cmd, timeout)?;

    let failure = match run {
        CommandRun::Finished(out) if out.status.success() => None,
        CommandRun::Finished(out) => Some(out.stderr_text()),
        CommandRun::TimedOut => Some(format!("ffmpeg timed out after {:?}", timeout)),
    };

    if let Some(message) = failure {
        remove_partial(output);
        return Err(Error::frame_extraction(input, offset_secs, message));
    }

    if !output.exists() {
        return Err(Error::frame_extraction(
            input,
            offset_secs,
            "ffmpeg produced no output file",
        ));
    }

    Ok(())
}

fn remove_partial(output: &Path) {
    if output.exists() {
        let _ = std::fs::remove_file(output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_frame_args_two_stage_seek() {
        let args = frame_args(
            Path::new("/media/clip.mp4"),
            30.0,
            Path::new("/shots/f.jpg"),
        );

        // Coarse seek before -i, fine seek after
        let i_pos = args.iter().position(|a| a == "-i").unwrap();
        let first_ss = args.iter().position(|a| a == "-ss").unwrap();
        assert!(first_ss < i_pos);
        assert_eq!(args[first_ss + 1], "28.000");

        let second_ss = args.iter().rposition(|a| a == "-ss").unwrap();
        assert!(second_ss > i_pos);
        assert_eq!(args[second_ss + 1], "2.000");

        assert!(args.contains(&"-frames:v".to_string()));
        assert_eq!(args.last().unwrap(), "/shots/f.jpg");
    }

    #[test]
    fn test_frame_args_near_start_skips_coarse_seek() {
        let args = frame_args(
            Path::new("/media/clip.mp4"),
            1.0,
            Path::new("/shots/f.jpg"),
        );

        // Offset inside the seek margin: only the precise seek remains.
        let i_pos = args.iter().position(|a| a == "-i").unwrap();
        let first_ss = args.iter().position(|a| a == "-ss").unwrap();
        assert!(first_ss > i_pos);
        assert_eq!(args[first_ss + 1], "1.000");
    }

    #[test]
    fn test_extract_frame_missing_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("f.jpg");

        let err = extract_frame_with_ffmpeg(
            Path::new("definitely-not-a-real-binary"),
            Path::new("/media/clip.mp4"),
            10.0,
            &output,
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_remove_partial_ignores_missing() {
        remove_partial(&PathBuf::from("/nonexistent/f.jpg"));
    }
}
