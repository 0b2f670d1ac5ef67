//! Internal Rust models matching the database schema.
//!
//! This module provides strongly-typed structures that map to database tables.
//! Identifier fields use the typed wrappers from framevault-common.

use chrono::{DateTime, Utc};
use framevault_common::VideoId;
use serde::{Deserialize, Serialize};

/// Catalog entry for one registered source video.
///
/// `path` is unique across all entries; `duration_secs` is `0.0` until the
/// file has been probed. The metadata fields (`title`, `description`, `tags`,
/// `external_video_id`) are populated by outside collaborators and are
/// preserved across screenshot operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: VideoId,
    pub path: String,
    pub duration_secs: f64,
    pub screenshots: Vec<Screenshot>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub external_video_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Video {
    /// Create a fresh entry for a newly discovered file: zeroed duration,
    /// empty screenshot set, no metadata.
    pub fn new_discovered(path: String, now: DateTime<Utc>) -> Self {
        Self {
            id: VideoId::new(),
            path,
            duration_secs: 0.0,
            screenshots: Vec::new(),
            title: None,
            description: None,
            tags: Vec::new(),
            external_video_id: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Whether a probed duration has been cached for this entry.
    pub fn has_cached_duration(&self) -> bool {
        self.duration_secs > 0.0
    }
}

/// One extracted still frame belonging to a video entry.
///
/// The record's lifetime is governed by the owning entry: the image file and
/// this record are created and removed together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Screenshot {
    pub video_id: VideoId,
    pub path: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}
