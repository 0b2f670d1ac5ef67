//! Filesystem discovery of candidate video files.
//!
//! The scanner accepts a heterogeneous list of entries (individual files
//! and directory trees, e.g. a drag-and-drop payload) and yields the subset
//! that look like videos. Non-video entries are silently dropped; unreadable
//! entries are logged and skipped. Directory expansion is recursive,
//! deterministic, and bounded: walkdir's ancestor check terminates symlink
//! cycles when links are followed.

use framevault_common::paths::is_video_file;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One candidate video file produced by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Canonical absolute path.
    pub path: PathBuf,
    /// File size at discovery time.
    pub size_bytes: u64,
}

/// Scanner for locating video files among arbitrary filesystem entries.
#[derive(Debug, Default)]
pub struct FileScanner;

impl FileScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Expand `entries` into the deduplicated, ordered list of video files
    /// they contain.
    ///
    /// Blocking: walks directory trees. Run off any latency-sensitive path.
    pub fn scan(&self, entries: &[PathBuf]) -> Vec<DiscoveredFile> {
        let mut seen = HashSet::new();
        let mut discovered = Vec::new();

        for entry in entries {
            if entry.is_dir() {
                self.scan_directory(entry, &mut seen, &mut discovered);
            } else {
                self.consider_file(entry, &mut seen, &mut discovered);
            }
        }

        debug!(
            candidates = entries.len(),
            videos = discovered.len(),
            "scan complete"
        );
        discovered
    }

    fn scan_directory(
        &self,
        dir: &Path,
        seen: &mut HashSet<PathBuf>,
        discovered: &mut Vec<DiscoveredFile>,
    ) {
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry under {:?}: {}", dir, e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            self.consider_file(entry.path(), seen, discovered);
        }
    }

    fn consider_file(
        &self,
        path: &Path,
        seen: &mut HashSet<PathBuf>,
        discovered: &mut Vec<DiscoveredFile>,
    ) {
        if !is_video_file(path) {
            debug!("skipping non-video entry {:?}", path);
            return;
        }

        let canonical = match std::fs::canonicalize(path) {
            Ok(canonical) => canonical,
            Err(e) => {
                warn!("skipping unreadable file {:?}: {}", path, e);
                return;
            }
        };

        if !seen.insert(canonical.clone()) {
            return;
        }

        let size_bytes = match std::fs::metadata(&canonical) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("skipping unreadable file {:?}: {}", canonical, e);
                return;
            }
        };

        discovered.push(DiscoveredFile {
            path: canonical,
            size_bytes,
        });
    }
}
