//! Video catalog queries.
//!
//! This module provides the store operations for video entries and their
//! screenshot records: transactional whole-entry upsert, point lookup by id
//! and by path, full scan, and idempotent delete.
//!
//! An upsert replaces the entry wholesale, including its screenshot set; a
//! video's screenshots are never merged row-by-row.

use chrono::{DateTime, Utc};
use framevault_common::{Error, Result, VideoId};
use rusqlite::Connection;

use crate::models::{Screenshot, Video};

/// Parse a video from a database row, without its screenshots.
///
/// Expects columns in order: id, path, duration_secs, title, description,
/// tags, external_video_id, created_at, modified_at.
fn parse_video_row(row: &rusqlite::Row) -> rusqlite::Result<Video> {
    let tags_json: String = row.get(5)?;

    Ok(Video {
        id: VideoId::parse_str(&row.get::<_, String>(0)?).unwrap(),
        path: row.get(1)?,
        duration_secs: row.get(2)?,
        screenshots: Vec::new(),
        title: row.get(3)?,
        description: row.get(4)?,
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        external_video_id: row.get(6)?,
        created_at: DateTime::parse_from_rfc3339(&row.get::<_, String>(7)?)
            .unwrap()
            .with_timezone(&Utc),
        modified_at: DateTime::parse_from_rfc3339(&row.get::<_, String>(8)?)
            .unwrap()
            .with_timezone(&Utc),
    })
}

/// Parse a screenshot from a database row.
///
/// Expects columns in order: video_id, path, position, created_at, modified_at.
fn parse_screenshot_row(row: &rusqlite::Row) -> rusqlite::Result<Screenshot> {
    Ok(Screenshot {
        video_id: VideoId::parse_str(&row.get::<_, String>(0)?).unwrap(),
        path: row.get(1)?,
        position: row.get(2)?,
        created_at: DateTime::parse_from_rfc3339(&row.get::<_, String>(3)?)
            .unwrap()
            .with_timezone(&Utc),
        modified_at: DateTime::parse_from_rfc3339(&row.get::<_, String>(4)?)
            .unwrap()
            .with_timezone(&Utc),
    })
}

/// Load the ordered screenshot set for a video.
fn load_screenshots(conn: &Connection, video_id: VideoId) -> Result<Vec<Screenshot>> {
    let mut stmt = conn
        .prepare(
            "SELECT video_id, path, position, created_at, modified_at
             FROM screenshots
             WHERE video_id = :video_id
             ORDER BY position",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let screenshots = stmt
        .query_map(
            rusqlite::named_params! { ":video_id": video_id.to_string() },
            parse_screenshot_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(screenshots)
}

/// Insert or fully replace a video entry, including its screenshot set.
///
/// Runs in a transaction: the videos row is upserted, the previous screenshot
/// rows are removed, and the entry's current set is written back.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `video` - Entry to upsert
///
/// # Returns
///
/// * `Ok(())` - If the operation succeeded
/// * `Err(Error::StoreWrite)` - If the persistence layer rejected the write
pub fn upsert_video(conn: &mut Connection, video: &Video) -> Result<()> {
    let tags_json =
        serde_json::to_string(&video.tags).map_err(|e| Error::internal(e.to_string()))?;

    let tx = conn
        .transaction()
        .map_err(|e| Error::store_write(e.to_string()))?;

    tx.execute(
        "INSERT INTO videos (
            id, path, duration_secs, title, description, tags,
            external_video_id, created_at, modified_at
         ) VALUES (
            :id, :path, :duration_secs, :title, :description, :tags,
            :external_video_id, :created_at, :modified_at
         )
         ON CONFLICT(id) DO UPDATE SET
            path = :path,
            duration_secs = :duration_secs,
            title = :title,
            description = :description,
            tags = :tags,
            external_video_id = :external_video_id,
            created_at = :created_at,
            modified_at = :modified_at",
        rusqlite::named_params! {
            ":id": video.id.to_string(),
            ":path": &video.path,
            ":duration_secs": video.duration_secs,
            ":title": &video.title,
            ":description": &video.description,
            ":tags": &tags_json,
            ":external_video_id": &video.external_video_id,
            ":created_at": video.created_at.to_rfc3339(),
            ":modified_at": video.modified_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::store_write(e.to_string()))?;

    tx.execute(
        "DELETE FROM screenshots WHERE video_id = :video_id",
        rusqlite::named_params! { ":video_id": video.id.to_string() },
    )
    .map_err(|e| Error::store_write(e.to_string()))?;

    for screenshot in &video.screenshots {
        tx.execute(
            "INSERT INTO screenshots (video_id, path, position, created_at, modified_at)
             VALUES (:video_id, :path, :position, :created_at, :modified_at)",
            rusqlite::named_params! {
                ":video_id": video.id.to_string(),
                ":path": &screenshot.path,
                ":position": screenshot.position,
                ":created_at": screenshot.created_at.to_rfc3339(),
                ":modified_at": screenshot.modified_at.to_rfc3339(),
            },
        )
        .map_err(|e| Error::store_write(e.to_string()))?;
    }

    tx.commit().map_err(|e| Error::store_write(e.to_string()))?;

    Ok(())
}

/// Get a video by ID, with its screenshots.
///
/// # Returns
///
/// * `Ok(Some(Video))` - The entry if found
/// * `Ok(None)` - If no entry has this id
/// * `Err(Error)` - If a database error occurs
pub fn get_video(conn: &Connection, id: VideoId) -> Result<Option<Video>> {
    let result = conn.query_row(
        "SELECT id, path, duration_secs, title, description, tags,
                external_video_id, created_at, modified_at
         FROM videos WHERE id = :id",
        rusqlite::named_params! { ":id": id.to_string() },
        parse_video_row,
    );

    match result {
        Ok(mut video) => {
            video.screenshots = load_screenshots(conn, video.id)?;
            Ok(Some(video))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get a video by its source path, with its screenshots.
pub fn get_video_by_path(conn: &Connection, path: &str) -> Result<Option<Video>> {
    let result = conn.query_row(
        "SELECT id, path, duration_secs, title, description, tags,
                external_video_id, created_at, modified_at
         FROM videos WHERE path = :path",
        rusqlite::named_params! { ":path": path },
        parse_video_row,
    );

    match result {
        Ok(mut video) => {
            video.screenshots = load_screenshots(conn, video.id)?;
            Ok(Some(video))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all videos with their screenshots.
///
/// Ordered by creation time then id, so the result is stable within a call.
pub fn list_videos(conn: &Connection) -> Result<Vec<Video>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, path, duration_secs, title, description, tags,
                    external_video_id, created_at, modified_at
             FROM videos
             ORDER BY created_at, id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let mut videos = stmt
        .query_map([], parse_video_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    for video in &mut videos {
        video.screenshots = load_screenshots(conn, video.id)?;
    }

    Ok(videos)
}

/// Delete a video by ID.
///
/// Screenshot rows are removed by the foreign-key cascade. Deleting an
/// absent id is not an error.
///
/// # Returns
///
/// * `Ok(true)` - If the entry was deleted
/// * `Ok(false)` - If no entry had this id
/// * `Err(Error::StoreWrite)` - If the persistence layer rejected the delete
pub fn delete_video(conn: &Connection, id: VideoId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM videos WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(|e| Error::store_write(e.to_string()))?;

    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    fn test_video(path: &str) -> Video {
        Video::new_discovered(path.to_string(), Utc::now())
    }

    fn test_screenshot(video_id: VideoId, path: &str, position: i64) -> Screenshot {
        let now = Utc::now();
        Screenshot {
            video_id,
            path: path.to_string(),
            position,
            created_at: now,
            modified_at: now,
        }
    }

    #[test]
    fn test_upsert_and_get_video() {
        let pool = init_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();

        let mut video = test_video("/media/clip.mp4");
        video.title = Some("Clip".to_string());
        video.tags = vec!["travel".to_string(), "day".to_string()];
        upsert_video(&mut conn, &video).unwrap();

        let found = get_video(&conn, video.id).unwrap().unwrap();
        assert_eq!(found.id, video.id);
        assert_eq!(found.path, "/media/clip.mp4");
        assert_eq!(found.title, Some("Clip".to_string()));
        assert_eq!(found.tags, vec!["travel", "day"]);
        assert!(found.screenshots.is_empty());
    }

    #[test]
    fn test_get_video_not_found() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let found = get_video(&conn, VideoId::new()).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_screenshots_roundtrip_in_position_order() {
        let pool = init_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();

        let mut video = test_video("/media/clip.mp4");
        video.screenshots = vec![
            test_screenshot(video.id, "/shots/b.jpg", 1),
            test_screenshot(video.id, "/shots/a.jpg", 0),
            test_screenshot(video.id, "/shots/c.jpg", 2),
        ];
        upsert_video(&mut conn, &video).unwrap();

        let found = get_video(&conn, video.id).unwrap().unwrap();
        let paths: Vec<_> = found.screenshots.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["/shots/a.jpg", "/shots/b.jpg", "/shots/c.jpg"]);
    }

    #[test]
    fn test_upsert_replaces_screenshot_set() {
        let pool = init_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();

        let mut video = test_video("/media/clip.mp4");
        video.screenshots = vec![
            test_screenshot(video.id, "/shots/old_1.jpg", 0),
            test_screenshot(video.id, "/shots/old_2.jpg", 1),
        ];
        upsert_video(&mut conn, &video).unwrap();

        video.screenshots = vec![test_screenshot(video.id, "/shots/new_1.jpg", 0)];
        upsert_video(&mut conn, &video).unwrap();

        let found = get_video(&conn, video.id).unwrap().unwrap();
        assert_eq!(found.screenshots.len(), 1);
        assert_eq!(found.screenshots[0].path, "/shots/new_1.jpg");
    }

    #[test]
    fn test_get_video_by_path() {
        let pool = init_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();

        let video = test_video("/media/clip.mp4");
        upsert_video(&mut conn, &video).unwrap();

        let found = get_video_by_path(&conn, "/media/clip.mp4").unwrap().unwrap();
        assert_eq!(found.id, video.id);

        let missing = get_video_by_path(&conn, "/media/other.mp4").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let pool = init_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();

        upsert_video(&mut conn, &test_video("/media/clip.mp4")).unwrap();

        // Different id, same path: violates the uniqueness constraint.
        let dup = test_video("/media/clip.mp4");
        let err = upsert_video(&mut conn, &dup).unwrap_err();
        assert!(matches!(err, Error::StoreWrite(_)));
    }

    #[test]
    fn test_list_videos_stable_order() {
        let pool = init_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();

        for path in ["/media/a.mp4", "/media/b.mp4", "/media/c.mp4"] {
            upsert_video(&mut conn, &test_video(path)).unwrap();
        }

        let first = list_videos(&conn).unwrap();
        let second = list_videos(&conn).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_delete_video() {
        let pool = init_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();

        let mut video = test_video("/media/clip.mp4");
        video.screenshots = vec![test_screenshot(video.id, "/shots/f.jpg", 0)];
        upsert_video(&mut conn, &video).unwrap();

        assert!(delete_video(&conn, video.id).unwrap());
        assert!(get_video(&conn, video.id).unwrap().is_none());

        // Cascade removed the screenshot rows
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM screenshots", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_delete_video_idempotent() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        assert!(!delete_video(&conn, VideoId::new()).unwrap());
    }
}
