//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use chrono::Utc;
use framevault::capture::CaptureEvent;
use framevault::library::VideoLibrary;
use framevault_av::{Error as AvError, MediaProbe, Result as AvResult};
use framevault_db::models::Video;
use framevault_db::pool::init_memory_pool;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One recorded `extract_frame` invocation.
#[derive(Debug, Clone)]
pub struct ExtractCall {
    pub source: PathBuf,
    pub offset_secs: f64,
    pub output: PathBuf,
}

type ExtractHook = Box<dyn Fn(usize) + Send + Sync>;

/// A `MediaProbe` double: fixed duration, real output files, optional
/// failure injection, and a call log for assertions.
pub struct FakeProbe {
    duration_secs: f64,
    fail_probe: bool,
    fail_at_index: Option<usize>,
    extract_hook: Option<ExtractHook>,
    extract_calls: Mutex<Vec<ExtractCall>>,
    probe_calls: Mutex<usize>,
}

impl FakeProbe {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            fail_probe: false,
            fail_at_index: None,
            extract_hook: None,
            extract_calls: Mutex::new(Vec::new()),
            probe_calls: Mutex::new(0),
        }
    }

    /// A probe whose duration lookup always fails.
    pub fn unreadable() -> Self {
        let mut probe = Self::new(0.0);
        probe.fail_probe = true;
        probe
    }

    /// Fail the extraction with the given zero-based call index.
    pub fn fail_at(mut self, index: usize) -> Self {
        self.fail_at_index = Some(index);
        self
    }

    /// Invoke `hook` with the call index at the start of every extraction.
    pub fn on_extract(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.extract_hook = Some(Box::new(hook));
        self
    }

    /// All extraction invocations so far, including failed ones.
    pub fn extract_calls(&self) -> Vec<ExtractCall> {
        self.extract_calls.lock().unwrap().clone()
    }

    /// Number of duration probes so far.
    pub fn probe_calls(&self) -> usize {
        *self.probe_calls.lock().unwrap()
    }
}

impl MediaProbe for FakeProbe {
    fn probe_duration(&self, path: &Path) -> AvResult<f64> {
        *self.probe_calls.lock().unwrap() += 1;
        if self.fail_probe {
            return Err(AvError::media_unreadable(path, "fake decoder: unreadable"));
        }
        Ok(self.duration_secs)
    }

    fn extract_frame(&self, path: &Path, offset_secs: f64, output: &Path) -> AvResult<()> {
        let index = {
            let mut calls = self.extract_calls.lock().unwrap();
            calls.push(ExtractCall {
                source: path.to_path_buf(),
                offset_secs,
                output: output.to_path_buf(),
            });
            calls.len() - 1
        };

        if let Some(hook) = &self.extract_hook {
            hook(index);
        }

        if self.fail_at_index == Some(index) {
            return Err(AvError::frame_extraction(
                path,
                offset_secs,
                "fake decoder: no frame at offset",
            ));
        }

        std::fs::write(output, b"fake jpeg data")?;
        Ok(())
    }
}

/// A library over an in-memory catalog, a fake probe, and a scratch
/// screenshot directory.
pub struct TestLibrary {
    pub library: Arc<VideoLibrary>,
    pub probe: Arc<FakeProbe>,
    pub shots_dir: TempDir,
}

impl TestLibrary {
    pub fn with_probe(probe: FakeProbe) -> Self {
        init_tracing();

        let shots_dir = tempfile::tempdir().unwrap();
        let probe = Arc::new(probe);
        let library = Arc::new(VideoLibrary::from_parts(
            init_memory_pool().unwrap(),
            Arc::clone(&probe) as Arc<dyn MediaProbe>,
            shots_dir.path().to_path_buf(),
        ));

        Self {
            library,
            probe,
            shots_dir,
        }
    }

    pub fn new(duration_secs: f64) -> Self {
        Self::with_probe(FakeProbe::new(duration_secs))
    }

    /// Register an entry directly, bypassing the scanner.
    pub fn add_video(&self, path: &str) -> Video {
        let video = Video::new_discovered(path.to_string(), Utc::now());
        self.library.catalog().upsert(&video).unwrap();
        video
    }

    /// Files currently present under the per-video screenshot directory.
    pub fn files_for(&self, video: &Video) -> Vec<PathBuf> {
        let dir = self.shots_dir.path().join(video.id.to_string());
        match std::fs::read_dir(&dir) {
            Ok(entries) => {
                let mut files: Vec<_> = entries.map(|e| e.unwrap().path()).collect();
                files.sort();
                files
            }
            Err(_) => Vec::new(),
        }
    }
}

/// Drain a capture job: collect its progress values and the terminal event.
pub async fn drain_capture(
    job: &mut framevault::capture::CaptureJob,
) -> (Vec<f32>, CaptureEvent) {
    let mut progress = Vec::new();
    loop {
        match job.next_event().await {
            Some(CaptureEvent::Progress(value)) => progress.push(value),
            Some(terminal) => return (progress, terminal),
            None => panic!("capture job ended without a terminal event"),
        }
    }
}

/// Route tracing output through the test harness when `RUST_LOG` is set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {} to be close to {}",
        actual,
        expected
    );
}
