//! Typed ID wrappers for type safety across framevault.
//!
//! This module provides a newtype wrapper around UUIDs so that video
//! identifiers cannot be confused with arbitrary strings or other UUIDs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a catalog video entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(Uuid);

impl VideoId {
    /// Generate a new random video ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a video ID from its canonical string form.
    ///
    /// Used when reading ids back from database text columns.
    pub fn parse_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for VideoId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<VideoId> for Uuid {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_creation() {
        let id1 = VideoId::new();
        let id2 = VideoId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_video_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let video_id = VideoId::from(uuid);
        let uuid_back: Uuid = video_id.into();
        assert_eq!(uuid, uuid_back);
    }

    #[test]
    fn test_video_id_parse_roundtrip() {
        let id = VideoId::new();
        let parsed = VideoId::parse_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_video_id_parse_rejects_garbage() {
        assert!(VideoId::parse_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_video_id_serialization() {
        let id = VideoId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: VideoId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_video_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        let id = VideoId::new();
        set.insert(id);
        assert!(set.contains(&id));
    }
}
