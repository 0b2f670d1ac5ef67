//! Framevault-DB: Database schema, migrations, and query operations
//!
//! This crate provides the catalog's persistence layer using SQLite with
//! rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching the database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use framevault_db::pool::{init_pool, get_conn};
//! use framevault_db::queries::videos;
//!
//! let pool = init_pool("/var/lib/framevault/catalog.sqlite").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let all = videos::list_videos(&conn).unwrap();
//! println!("{} videos in catalog", all.len());
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
