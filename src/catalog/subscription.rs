//! Live-view subscription handles.
//!
//! A subscription delivers an initial snapshot immediately and a fresh value
//! after every catalog change, until the subscriber drops the handle. The
//! handles re-read from the catalog on each wakeup rather than trusting the
//! event payloads, so a lagged receiver only coalesces missed updates into
//! one fresh read instead of losing state.

use super::{CatalogEvent, VideoCatalog};
use framevault_common::{Error, Result, VideoId};
use framevault_db::models::Video;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Live view over the full catalog.
///
/// The first `next()` resolves immediately with the current snapshot; each
/// later `next()` resolves with a fresh listing after a change. Dropping the
/// handle cancels the subscription.
pub struct AllVideosWatch {
    catalog: Arc<VideoCatalog>,
    rx: broadcast::Receiver<CatalogEvent>,
    delivered_initial: bool,
}

impl AllVideosWatch {
    pub(super) fn new(catalog: Arc<VideoCatalog>, rx: broadcast::Receiver<CatalogEvent>) -> Self {
        Self {
            catalog,
            rx,
            delivered_initial: false,
        }
    }

    /// Wait for the next value of the view.
    pub async fn next(&mut self) -> Result<Vec<Video>> {
        if !self.delivered_initial {
            self.delivered_initial = true;
            return self.catalog.list_all();
        }

        match self.rx.recv().await {
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => self.catalog.list_all(),
            Err(broadcast::error::RecvError::Closed) => {
                Err(Error::internal("catalog event channel closed"))
            }
        }
    }
}

/// Live view over a single entry.
///
/// The first `next()` resolves immediately with the current entry; each later
/// `next()` resolves after a change to it. Yields `None` once the entry is
/// deleted, after which the view is finished. Dropping the handle cancels the
/// subscription.
pub struct VideoWatch {
    catalog: Arc<VideoCatalog>,
    rx: broadcast::Receiver<CatalogEvent>,
    id: VideoId,
    delivered_initial: bool,
    ended: bool,
}

impl VideoWatch {
    pub(super) fn new(
        catalog: Arc<VideoCatalog>,
        rx: broadcast::Receiver<CatalogEvent>,
        id: VideoId,
    ) -> Self {
        Self {
            catalog,
            rx,
            id,
            delivered_initial: false,
            ended: false,
        }
    }

    /// Wait for the next value of the view, or `None` once the entry is gone.
    pub async fn next(&mut self) -> Result<Option<Video>> {
        if self.ended {
            return Ok(None);
        }

        if !self.delivered_initial {
            self.delivered_initial = true;
            return self.read_current();
        }

        loop {
            match self.rx.recv().await {
                Ok(CatalogEvent::VideoUpserted(video)) if video.id == self.id => {
                    return Ok(Some(video));
                }
                Ok(CatalogEvent::VideoDeleted(id)) if id == self.id => {
                    self.ended = true;
                    return Ok(None);
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => return self.read_current(),
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(Error::internal("catalog event channel closed"));
                }
            }
        }
    }

    fn read_current(&mut self) -> Result<Option<Video>> {
        match self.catalog.get(self.id) {
            Ok(video) => Ok(Some(video)),
            Err(Error::NotFound(_)) => {
                self.ended = true;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
