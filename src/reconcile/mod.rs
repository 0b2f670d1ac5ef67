//! Reconciliation of discovered files against the catalog.
//!
//! Reconciliation computes the set difference by path between the scanner's
//! output and the current catalog snapshot, and registers the new paths as
//! fresh entries. Existing entries are left untouched, so repeating a scan
//! over the same files never creates duplicates or re-processes anything.

use crate::catalog::VideoCatalog;
use crate::scanner::DiscoveredFile;
use chrono::Utc;
use framevault_common::{Error, Result, VideoId};
use framevault_db::models::Video;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileSummary {
    /// Ids of freshly created entries, in discovery order.
    pub added: Vec<VideoId>,
    /// Number of candidates already present in the catalog.
    pub skipped: usize,
    /// Candidates whose insert failed, with the failure. A failed item does
    /// not abort the rest of the batch.
    pub failed: Vec<(PathBuf, Error)>,
}

/// Aligns catalog contents with currently discovered filesystem entries.
pub struct Reconciler {
    catalog: Arc<VideoCatalog>,
}

impl Reconciler {
    /// Create a reconciler over a catalog.
    pub fn new(catalog: Arc<VideoCatalog>) -> Self {
        Self { catalog }
    }

    /// Register every candidate not already present in the catalog.
    ///
    /// New entries get a fresh id, zeroed duration, an empty screenshot set,
    /// and no metadata. Idempotent with respect to path: running the same
    /// file list twice adds nothing the second time.
    pub fn reconcile(&self, files: &[DiscoveredFile]) -> Result<ReconcileSummary> {
        let mut known: HashSet<String> = self
            .catalog
            .list_all()?
            .into_iter()
            .map(|video| video.path)
            .collect();

        let mut summary = ReconcileSummary::default();

        for file in files {
            let path = file.path.to_string_lossy().to_string();

            if known.contains(&path) {
                debug!("already cataloged: {}", path);
                summary.skipped += 1;
                continue;
            }

            let video = Video::new_discovered(path.clone(), Utc::now());
            match self.catalog.upsert(&video) {
                Ok(()) => {
                    debug!(id = %video.id, "registered {}", path);
                    known.insert(path);
                    summary.added.push(video.id);
                }
                Err(e) => {
                    warn!("failed to register {}: {}", path, e);
                    summary.failed.push((file.path.clone(), e));
                }
            }
        }

        info!(
            discovered = files.len(),
            added = summary.added.len(),
            skipped = summary.skipped,
            failed = summary.failed.len(),
            "reconcile complete"
        );
        Ok(summary)
    }
}
