//! The screenshot pipeline.
//!
//! A capture run resolves a catalog entry, probes its duration when no cached
//! value exists, plans evenly spaced sample offsets, and extracts one frame
//! per offset, reporting fractional progress after each frame. A completed
//! run atomically replaces the entry's screenshot set; a failed or cancelled
//! run deletes its partial output and leaves the previously committed set
//! untouched.
//!
//! Frame extraction is blocking and runs on a dedicated blocking task. The
//! consumer cancels through the job handle; the worker observes the flag
//! between frame extractions.

mod timestamps;

pub use timestamps::plan_timestamps;

use crate::catalog::VideoCatalog;
use framevault_av::MediaProbe;
use framevault_common::{Error, VideoId};
use framevault_db::models::Video;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Terminal failure of a capture run.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The referenced entry does not exist, or was deleted mid-run.
    #[error("video {0} not found")]
    NotFound(VideoId),

    /// Probing or frame extraction failed.
    #[error(transparent)]
    Media(framevault_av::Error),

    /// The catalog rejected a read or the final commit.
    #[error(transparent)]
    Store(Error),
}

/// Event emitted by a capture run.
///
/// Zero or more `Progress` values in ascending order, then exactly one
/// terminal event: `Completed`, `Failed`, or `Cancelled`.
#[derive(Debug)]
pub enum CaptureEvent {
    /// Fraction of requested frames completed, in `(0, 1]`.
    Progress(f32),
    /// The run committed; carries the updated entry.
    Completed(Video),
    /// The run aborted; partial output was removed, nothing was committed.
    Failed(CaptureError),
    /// The run was cancelled; partial output was removed, nothing was
    /// committed.
    Cancelled,
}

/// Options for a capture run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureOptions {
    /// Re-probe the duration even when a cached value exists.
    pub force_probe: bool,
}

/// Cloneable cancellation handle for an in-flight capture run.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Request cancellation. The worker stops before the next frame
    /// extraction and cleans up this run's partial output.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to one capture invocation.
pub struct CaptureJob {
    events: mpsc::Receiver<CaptureEvent>,
    cancel: CancelHandle,
}

impl CaptureJob {
    /// Receive the next event, or `None` after the terminal event.
    pub async fn next_event(&mut self) -> Option<CaptureEvent> {
        self.events.recv().await
    }

    /// Request cancellation of the run.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A cloneable handle for cancelling from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

/// Orchestrates timestamp planning and frame extraction for catalog entries.
pub struct ScreenshotPipeline {
    catalog: Arc<VideoCatalog>,
    probe: Arc<dyn MediaProbe>,
    output_dir: PathBuf,
}

impl ScreenshotPipeline {
    /// Create a pipeline writing frames beneath `output_dir`, one
    /// subdirectory per video.
    pub fn new(catalog: Arc<VideoCatalog>, probe: Arc<dyn MediaProbe>, output_dir: PathBuf) -> Self {
        Self {
            catalog,
            probe,
            output_dir,
        }
    }

    /// Start a capture run for `video_id` with default options.
    ///
    /// Must be called from within a tokio runtime; the run itself executes
    /// on a blocking task.
    pub fn capture(&self, video_id: VideoId, sample_count: u32) -> CaptureJob {
        self.capture_with(video_id, sample_count, CaptureOptions::default())
    }

    /// Start a capture run for `video_id`.
    pub fn capture_with(
        &self,
        video_id: VideoId,
        sample_count: u32,
        options: CaptureOptions,
    ) -> CaptureJob {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancelHandle(Arc::new(AtomicBool::new(false)));

        let worker = CaptureWorker {
            catalog: Arc::clone(&self.catalog),
            probe: Arc::clone(&self.probe),
            output_dir: self.output_dir.clone(),
            video_id,
            sample_count,
            options,
            cancel: cancel.clone(),
            tx,
        };
        tokio::task::spawn_blocking(move || worker.run());

        CaptureJob { events: rx, cancel }
    }
}

struct CaptureWorker {
    catalog: Arc<VideoCatalog>,
    probe: Arc<dyn MediaProbe>,
    output_dir: PathBuf,
    video_id: VideoId,
    sample_count: u32,
    options: CaptureOptions,
    cancel: CancelHandle,
    tx: mpsc::Sender<CaptureEvent>,
}

impl CaptureWorker {
    fn run(self) {
        let terminal = self.execute();
        match &terminal {
            CaptureEvent::Completed(video) => {
                info!(id = %video.id, frames = video.screenshots.len(), "capture complete");
            }
            CaptureEvent::Failed(e) => warn!(id = %self.video_id, "capture failed: {}", e),
            CaptureEvent::Cancelled => debug!(id = %self.video_id, "capture cancelled"),
            CaptureEvent::Progress(_) => unreachable!("progress is not a terminal event"),
        }
        // The receiver may already be gone; a dropped consumer is implicit
        // cancellation of interest, not an error.
        let _ = self.tx.blocking_send(terminal);
    }

    fn execute(&self) -> CaptureEvent {
        let video = match self.catalog.get(self.video_id) {
            Ok(video) => video,
            Err(Error::NotFound(_)) => {
                return CaptureEvent::Failed(CaptureError::NotFound(self.video_id));
            }
            Err(e) => return CaptureEvent::Failed(CaptureError::Store(e)),
        };
        let source = Path::new(&video.path);

        let duration_secs = if video.has_cached_duration() && !self.options.force_probe {
            video.duration_secs
        } else {
            match self.probe.probe_duration(source) {
                Ok(duration) => duration,
                Err(e) => return CaptureEvent::Failed(CaptureError::Media(e)),
            }
        };

        let offsets = match plan_timestamps(self.sample_count, duration_secs) {
            Ok(offsets) => offsets,
            Err(e) => return CaptureEvent::Failed(CaptureError::Store(e)),
        };

        let video_dir = self.output_dir.join(video.id.to_string());
        if let Err(e) = std::fs::create_dir_all(&video_dir) {
            return CaptureEvent::Failed(CaptureError::Store(e.into()));
        }

        // Per-run tag keeps this run's output distinct from any prior set.
        let run_tag = Uuid::new_v4().simple().to_string();
        let run_tag = &run_tag[..8];

        let mut written: Vec<PathBuf> = Vec::with_capacity(offsets.len());
        for (index, offset_secs) in offsets.iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.discard(&written);
                return CaptureEvent::Cancelled;
            }

            let output = video_dir.join(format!("{}_{:03}.jpg", run_tag, index + 1));
            if let Err(e) = self.probe.extract_frame(source, *offset_secs, &output) {
                self.discard(&written);
                return CaptureEvent::Failed(CaptureError::Media(e));
            }
            written.push(output);

            let progress = (index + 1) as f32 / self.sample_count as f32;
            if self.tx.blocking_send(CaptureEvent::Progress(progress)).is_err() {
                // Consumer dropped the job; treat as cancellation.
                self.discard(&written);
                return CaptureEvent::Cancelled;
            }
        }

        if self.cancel.is_cancelled() {
            self.discard(&written);
            return CaptureEvent::Cancelled;
        }

        match self
            .catalog
            .commit_screenshots(self.video_id, duration_secs, written.clone())
        {
            Ok(commit) => {
                for displaced in &commit.displaced {
                    match std::fs::remove_file(displaced) {
                        Ok(()) => {}
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                        Err(e) => warn!("failed to remove displaced screenshot {}: {}", displaced, e),
                    }
                }
                CaptureEvent::Completed(commit.video)
            }
            Err(Error::NotFound(_)) => {
                // Entry deleted while frames were extracting; the delete wins.
                self.discard(&written);
                CaptureEvent::Failed(CaptureError::NotFound(self.video_id))
            }
            Err(e) => {
                self.discard(&written);
                CaptureEvent::Failed(CaptureError::Store(e))
            }
        }
    }

    /// Remove this run's partially written frames.
    fn discard(&self, written: &[PathBuf]) {
        for path in written {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("failed to remove partial frame {:?}: {}", path, e);
                }
            }
        }
        // Drop the per-video directory when this run created it empty.
        let _ = std::fs::remove_dir(self.output_dir.join(self.video_id.to_string()));
    }
}
