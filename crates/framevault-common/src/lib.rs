//! Framevault-Common: Shared types and utilities
//!
//! This crate provides the pieces shared by every framevault crate:
//!
//! - `error` - The common error type and `Result` alias
//! - `ids` - Typed UUID wrappers
//! - `paths` - File-type detection by extension

pub mod error;
pub mod ids;
pub mod paths;

pub use error::{Error, Result};
pub use ids::VideoId;
