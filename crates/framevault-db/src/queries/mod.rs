//! Database query operations.

pub mod videos;
