//! Media probing module.
//!
//! The [`MediaProbe`] trait is the boundary the catalog core programs
//! against: duration lookup and frame extraction, both blocking. The
//! production implementation shells out to ffprobe and ffmpeg; tests
//! substitute a fake.

pub(crate) mod ffprobe;

use crate::{frame, tools, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default bound on a single ffprobe/ffmpeg invocation.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Abstract probing/decoding capability.
///
/// Both operations are synchronous and may block for up to the
/// implementation's configured timeout; invoke them off any
/// latency-sensitive path.
pub trait MediaProbe: Send + Sync {
    /// Report the container duration of the file at `path`, in seconds.
    fn probe_duration(&self, path: &Path) -> Result<f64>;

    /// Render the frame nearest `offset_secs` of `path` into `output`.
    fn extract_frame(&self, path: &Path, offset_secs: f64, output: &Path) -> Result<()>;
}

/// Production probe backed by the ffprobe and ffmpeg CLI tools.
#[derive(Debug, Clone)]
pub struct FfmpegProbe {
    ffprobe_bin: PathBuf,
    ffmpeg_bin: PathBuf,
    timeout: Duration,
}

impl FfmpegProbe {
    /// Locate ffprobe and ffmpeg on PATH and build a probe with the default
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ToolNotFound`] if either tool is missing.
    pub fn new() -> Result<Self> {
        Ok(Self {
            ffprobe_bin: tools::require_tool("ffprobe")?,
            ffmpeg_bin: tools::require_tool("ffmpeg")?,
            timeout: DEFAULT_TOOL_TIMEOUT,
        })
    }

    /// Build a probe from explicit tool paths, bypassing PATH lookup.
    pub fn with_binaries(ffprobe_bin: PathBuf, ffmpeg_bin: PathBuf) -> Self {
        Self {
            ffprobe_bin,
            ffmpeg_bin,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Set the per-invocation timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl MediaProbe for FfmpegProbe {
    fn probe_duration(&self, path: &Path) -> Result<f64> {
        ffprobe::probe_duration_with_ffprobe(&self.ffprobe_bin, path, self.timeout)
    }

    fn extract_frame(&self, path: &Path, offset_secs: f64, output: &Path) -> Result<()> {
        frame::extract_frame_with_ffmpeg(&self.ffmpeg_bin, path, offset_secs, output, self.timeout)
    }
}
