//! The persistent video catalog.
//!
//! [`VideoCatalog`] is the single source of truth for registered videos. It
//! wraps the database pool with whole-entry store operations, serializes
//! writers behind one lock, and broadcasts a [`CatalogEvent`] for every
//! committed change so subscribers can hold a live view without polling.

mod subscription;

pub use subscription::{AllVideosWatch, VideoWatch};

use chrono::Utc;
use framevault_common::{Error, Result, VideoId};
use framevault_db::models::{Screenshot, Video};
use framevault_db::pool::DbPool;
use framevault_db::queries::videos;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A committed change to the catalog.
#[derive(Debug, Clone)]
pub enum CatalogEvent {
    /// An entry was inserted or replaced.
    VideoUpserted(Video),
    /// An entry was removed.
    VideoDeleted(VideoId),
}

/// Result of committing a new screenshot set for an entry.
#[derive(Debug)]
pub struct ScreenshotCommit {
    /// The entry as persisted.
    pub video: Video,
    /// Paths of previously recorded screenshots that are no longer part of
    /// the entry's set. The caller owns removing these files.
    pub displaced: Vec<String>,
}

/// The durable registry of known videos and their screenshots.
pub struct VideoCatalog {
    pool: DbPool,
    event_tx: broadcast::Sender<CatalogEvent>,
    // Serializes read-modify-write sequences so concurrent mutations of the
    // same entry cannot interleave, and a delete racing a screenshot commit
    // cannot resurrect the deleted entry.
    write_lock: Mutex<()>,
}

impl VideoCatalog {
    /// Create a catalog over an initialized database pool.
    pub fn new(pool: DbPool) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Arc::new(Self {
            pool,
            event_tx,
            write_lock: Mutex::new(()),
        })
    }

    /// Insert or fully replace an entry, including its screenshot set.
    pub fn upsert(&self, video: &Video) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut conn = framevault_db::pool::get_conn(&self.pool)?;
        videos::upsert_video(&mut conn, video)?;
        drop(conn);

        self.broadcast(CatalogEvent::VideoUpserted(video.clone()));
        Ok(())
    }

    /// Get an entry by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if no entry has this id.
    pub fn get(&self, id: VideoId) -> Result<Video> {
        let conn = framevault_db::pool::get_conn(&self.pool)?;
        videos::get_video(&conn, id)?
            .ok_or_else(|| Error::not_found(format!("video {}", id)))
    }

    /// Get an entry by its source path, if one exists.
    pub fn get_by_path(&self, path: &str) -> Result<Option<Video>> {
        let conn = framevault_db::pool::get_conn(&self.pool)?;
        videos::get_video_by_path(&conn, path)
    }

    /// List all entries. The order is stable within a single call.
    pub fn list_all(&self) -> Result<Vec<Video>> {
        let conn = framevault_db::pool::get_conn(&self.pool)?;
        videos::list_videos(&conn)
    }

    /// Delete an entry by id. Deleting an absent id is not an error.
    ///
    /// Returns whether an entry was actually removed.
    pub fn delete(&self, id: VideoId) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let conn = framevault_db::pool::get_conn(&self.pool)?;
        let deleted = videos::delete_video(&conn, id)?;
        drop(conn);

        if deleted {
            self.broadcast(CatalogEvent::VideoDeleted(id));
        } else {
            debug!(%id, "delete of absent video is a no-op");
        }
        Ok(deleted)
    }

    /// Replace an entry's screenshot set with freshly extracted frames and
    /// update its cached duration.
    ///
    /// Runs under the write lock: if the entry was deleted while the frames
    /// were being extracted, this fails with `NotFound` and commits nothing.
    pub fn commit_screenshots(
        &self,
        id: VideoId,
        duration_secs: f64,
        frame_paths: Vec<PathBuf>,
    ) -> Result<ScreenshotCommit> {
        let _guard = self.write_lock.lock();
        let mut conn = framevault_db::pool::get_conn(&self.pool)?;

        let mut video = videos::get_video(&conn, id)?
            .ok_or_else(|| Error::not_found(format!("video {}", id)))?;

        let now = Utc::now();
        let new_set: Vec<Screenshot> = frame_paths
            .iter()
            .enumerate()
            .map(|(position, path)| Screenshot {
                video_id: id,
                path: path.to_string_lossy().to_string(),
                position: position as i64,
                created_at: now,
                modified_at: now,
            })
            .collect();

        let displaced: Vec<String> = video
            .screenshots
            .iter()
            .map(|s| s.path.clone())
            .filter(|old| !new_set.iter().any(|s| &s.path == old))
            .collect();

        video.duration_secs = duration_secs;
        video.screenshots = new_set;
        video.modified_at = now;

        videos::upsert_video(&mut conn, &video)?;
        drop(conn);

        self.broadcast(CatalogEvent::VideoUpserted(video.clone()));
        Ok(ScreenshotCommit { video, displaced })
    }

    /// Remove one screenshot record from an entry.
    ///
    /// Returns `Ok(None)` without touching the entry when the path is not
    /// part of its current set. The file itself is the caller's to remove.
    pub fn remove_screenshot_record(&self, id: VideoId, path: &str) -> Result<Option<Video>> {
        let _guard = self.write_lock.lock();
        let mut conn = framevault_db::pool::get_conn(&self.pool)?;

        let mut video = videos::get_video(&conn, id)?
            .ok_or_else(|| Error::not_found(format!("video {}", id)))?;

        let before = video.screenshots.len();
        video.screenshots.retain(|s| s.path != path);
        if video.screenshots.len() == before {
            debug!(%id, path, "screenshot not part of entry, nothing to remove");
            return Ok(None);
        }

        video.modified_at = Utc::now();
        videos::upsert_video(&mut conn, &video)?;
        drop(conn);

        self.broadcast(CatalogEvent::VideoUpserted(video.clone()));
        Ok(Some(video))
    }

    /// Subscribe to the raw change-event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.event_tx.subscribe()
    }

    /// Live view over all entries: an initial snapshot, then a fresh listing
    /// after every catalog change. Dropping the handle unsubscribes.
    pub fn watch_all(self: &Arc<Self>) -> AllVideosWatch {
        AllVideosWatch::new(Arc::clone(self), self.subscribe())
    }

    /// Live view over one entry: an initial snapshot, then an update per
    /// change, ending once the entry is deleted. Dropping the handle
    /// unsubscribes.
    pub fn watch_video(self: &Arc<Self>, id: VideoId) -> VideoWatch {
        VideoWatch::new(Arc::clone(self), self.subscribe(), id)
    }

    fn broadcast(&self, event: CatalogEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("no subscribers for catalog event");
        }
    }
}
