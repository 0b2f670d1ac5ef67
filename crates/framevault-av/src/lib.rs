//! Framevault-AV: media probing and frame extraction.
//!
//! This crate wraps the external ffprobe/ffmpeg command-line tools behind the
//! two operations the catalog core needs:
//!
//! - report a video container's duration in seconds
//! - render the frame nearest a given time offset to an image file
//!
//! Both operations are blocking and bounded by a configured timeout; callers
//! are expected to run them off any latency-sensitive path. The [`MediaProbe`]
//! trait is the seam that lets the screenshot pipeline run against a fake
//! decoder in tests.

mod cmd;
mod error;
mod frame;
mod probe;
mod tools;

pub use error::{Error, Result};
pub use frame::extract_frame_with_ffmpeg;
pub use probe::ffprobe::probe_duration_with_ffprobe;
pub use probe::{FfmpegProbe, MediaProbe};
pub use tools::{check_tool, check_tool_with_arg, require_tool, ToolInfo};
