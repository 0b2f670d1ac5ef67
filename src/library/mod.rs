//! The video library facade.
//!
//! [`VideoLibrary`] assembles the components (pool, catalog, scanner,
//! reconciler, screenshot pipeline) with explicit construction, and exposes
//! the operations consumed by outer layers: scan-and-reconcile, capture,
//! and the two deletion operations with their dangling-file reporting.

use crate::capture::{CaptureJob, CaptureOptions, ScreenshotPipeline};
use crate::catalog::VideoCatalog;
use crate::config::Config;
use crate::reconcile::{ReconcileSummary, Reconciler};
use crate::scanner::FileScanner;
use anyhow::Context;
use framevault_av::MediaProbe;
use framevault_common::{Error, Result, VideoId};
use framevault_db::pool::{init_pool, DbPool};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a deletion operation.
///
/// Record removal proceeds even when a file cannot be deleted; such paths are
/// reported here instead of failing the user-visible delete.
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Whether a catalog record was actually removed.
    pub deleted: bool,
    /// Files that could not be removed and may remain on disk.
    pub dangling_files: Vec<PathBuf>,
}

/// The assembled framevault service.
pub struct VideoLibrary {
    catalog: Arc<VideoCatalog>,
    scanner: FileScanner,
    reconciler: Reconciler,
    pipeline: ScreenshotPipeline,
    screenshots_dir: PathBuf,
}

impl VideoLibrary {
    /// Open a library from configuration: initialize the database, locate
    /// the ffmpeg tools, and create the screenshot output directory.
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let db_path = config.storage.resolved_database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {:?}", parent))?;
        }
        let pool = init_pool(&db_path.to_string_lossy())
            .with_context(|| format!("Failed to open catalog database {:?}", db_path))?;

        let screenshots_dir = config.storage.resolved_screenshots_dir();
        std::fs::create_dir_all(&screenshots_dir).with_context(|| {
            format!("Failed to create screenshot directory {:?}", screenshots_dir)
        })?;

        let probe = config.tools.build_probe().context("Failed to locate media tools")?;

        info!(
            database = %db_path.display(),
            screenshots = %screenshots_dir.display(),
            "opened video library"
        );
        Ok(Self::from_parts(pool, Arc::new(probe), screenshots_dir))
    }

    /// Assemble a library from explicit parts.
    ///
    /// This is the seam used by tests: any [`MediaProbe`] implementation and
    /// any initialized pool work here.
    pub fn from_parts(pool: DbPool, probe: Arc<dyn MediaProbe>, screenshots_dir: PathBuf) -> Self {
        let catalog = VideoCatalog::new(pool);
        let reconciler = Reconciler::new(Arc::clone(&catalog));
        let pipeline =
            ScreenshotPipeline::new(Arc::clone(&catalog), probe, screenshots_dir.clone());

        Self {
            catalog,
            scanner: FileScanner::new(),
            reconciler,
            pipeline,
            screenshots_dir,
        }
    }

    /// The catalog, for queries and live subscriptions.
    pub fn catalog(&self) -> &Arc<VideoCatalog> {
        &self.catalog
    }

    /// Directory under which screenshot files are written.
    pub fn screenshots_dir(&self) -> &Path {
        &self.screenshots_dir
    }

    /// Scan the given filesystem entries and register any new video files.
    ///
    /// Blocking: walks directory trees. Use [`Self::scan_and_reconcile`]
    /// from async contexts.
    pub fn scan_and_reconcile_blocking(&self, entries: &[PathBuf]) -> Result<ReconcileSummary> {
        let files = self.scanner.scan(entries);
        self.reconciler.reconcile(&files)
    }

    /// Scan the given filesystem entries and register any new video files,
    /// running the walk on a blocking task.
    pub async fn scan_and_reconcile(
        self: &Arc<Self>,
        entries: Vec<PathBuf>,
    ) -> Result<ReconcileSummary> {
        let library = Arc::clone(self);
        tokio::task::spawn_blocking(move || library.scan_and_reconcile_blocking(&entries))
            .await
            .map_err(|e| Error::internal(format!("scan task panicked: {}", e)))?
    }

    /// Start a screenshot capture run for an entry.
    pub fn capture(&self, video_id: VideoId, sample_count: u32) -> CaptureJob {
        self.pipeline.capture(video_id, sample_count)
    }

    /// Start a screenshot capture run with explicit options.
    pub fn capture_with(
        &self,
        video_id: VideoId,
        sample_count: u32,
        options: CaptureOptions,
    ) -> CaptureJob {
        self.pipeline.capture_with(video_id, sample_count, options)
    }

    /// Delete an entry and all of its screenshot files.
    ///
    /// Idempotent: deleting an absent id reports `deleted = false`. File
    /// removal failures do not block the record removal; the affected paths
    /// are reported as dangling.
    pub fn delete_video(&self, video_id: VideoId) -> Result<DeleteReport> {
        let video = match self.catalog.get(video_id) {
            Ok(video) => video,
            Err(Error::NotFound(_)) => {
                debug!(%video_id, "delete of unknown video is a no-op");
                return Ok(DeleteReport::default());
            }
            Err(e) => return Err(e),
        };

        let mut dangling_files = Vec::new();
        for screenshot in &video.screenshots {
            match std::fs::remove_file(&screenshot.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("screenshot file already gone: {}", screenshot.path);
                }
                Err(e) => {
                    warn!("failed to delete screenshot {}: {}", screenshot.path, e);
                    dangling_files.push(PathBuf::from(&screenshot.path));
                }
            }
        }
        let _ = std::fs::remove_dir(self.screenshots_dir.join(video_id.to_string()));

        let deleted = self.catalog.delete(video_id)?;
        info!(%video_id, dangling = dangling_files.len(), "deleted video");

        Ok(DeleteReport {
            deleted,
            dangling_files,
        })
    }

    /// Delete a single screenshot from an entry.
    ///
    /// A path the entry does not own is a logged no-op, not an error. The
    /// record is removed first; a failing file removal is reported as
    /// dangling rather than resurrecting the record.
    pub fn delete_screenshot(&self, video_id: VideoId, path: &Path) -> Result<DeleteReport> {
        let path_str = path.to_string_lossy();
        let removed = self.catalog.remove_screenshot_record(video_id, &path_str)?;

        if removed.is_none() {
            return Ok(DeleteReport::default());
        }

        let mut dangling_files = Vec::new();
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("screenshot file already gone: {:?}", path);
            }
            Err(e) => {
                warn!("failed to delete screenshot {:?}: {}", path, e);
                dangling_files.push(path.to_path_buf());
            }
        }

        Ok(DeleteReport {
            deleted: true,
            dangling_files,
        })
    }
}
