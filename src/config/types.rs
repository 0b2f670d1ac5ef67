use framevault_av::FfmpegProbe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path of the SQLite catalog database. Supports `~` expansion.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Directory for generated screenshot images. Supports `~` expansion.
    #[serde(default = "default_screenshots_dir")]
    pub screenshots_dir: String,
}

impl StorageConfig {
    /// The database path with `~` expanded.
    pub fn resolved_database_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.database_path).as_ref())
    }

    /// The screenshots directory with `~` expanded.
    pub fn resolved_screenshots_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.screenshots_dir).as_ref())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            screenshots_dir: default_screenshots_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Number of frames extracted per video when the caller does not choose.
    #[serde(default = "default_sample_count")]
    pub default_sample_count: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            default_sample_count: default_sample_count(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Explicit path to ffprobe; falls back to PATH lookup.
    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,

    /// Explicit path to ffmpeg; falls back to PATH lookup.
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Bound on a single ffprobe/ffmpeg invocation, in seconds.
    #[serde(default = "default_tool_timeout_secs")]
    pub timeout_secs: u64,
}

impl ToolsConfig {
    /// Build the production media probe from this configuration.
    pub fn build_probe(&self) -> framevault_av::Result<FfmpegProbe> {
        let probe = match (&self.ffprobe_path, &self.ffmpeg_path) {
            (Some(ffprobe), Some(ffmpeg)) => {
                FfmpegProbe::with_binaries(ffprobe.clone(), ffmpeg.clone())
            }
            (Some(ffprobe), None) => FfmpegProbe::with_binaries(
                ffprobe.clone(),
                framevault_av::require_tool("ffmpeg")?,
            ),
            (None, Some(ffmpeg)) => FfmpegProbe::with_binaries(
                framevault_av::require_tool("ffprobe")?,
                ffmpeg.clone(),
            ),
            (None, None) => FfmpegProbe::new()?,
        };

        Ok(probe.with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: None,
            ffmpeg_path: None,
            timeout_secs: default_tool_timeout_secs(),
        }
    }
}

fn default_database_path() -> String {
    "~/.local/share/framevault/catalog.sqlite".to_string()
}

fn default_screenshots_dir() -> String {
    "~/.local/share/framevault/screenshots".to_string()
}

fn default_sample_count() -> u32 {
    3
}

fn default_tool_timeout_secs() -> u64 {
    30
}
