//! Error types for framevault-av.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during media probing and frame extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// The source file is missing, corrupt, or not a valid media container.
    /// Timed-out probes report through this variant as well.
    #[error("unreadable media {}: {message}", path.display())]
    MediaUnreadable { path: PathBuf, message: String },

    /// The decoder could not produce a frame at the requested offset, or the
    /// output image could not be written. Timed-out extractions report
    /// through this variant as well.
    #[error("frame extraction failed for {} at {offset_secs:.3}s: {message}", path.display())]
    FrameExtraction {
        path: PathBuf,
        offset_secs: f64,
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create an unreadable-media error.
    pub fn media_unreadable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MediaUnreadable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a frame extraction error.
    pub fn frame_extraction(
        path: impl Into<PathBuf>,
        offset_secs: f64,
        message: impl Into<String>,
    ) -> Self {
        Self::FrameExtraction {
            path: path.into(),
            offset_secs,
            message: message.into(),
        }
    }
}
