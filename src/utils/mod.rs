//! Utility modules for wp-setup
//!
//! This module contains the filesystem and network helpers used by the
//! install pipeline:
//! - `files`: Directory creation, relocation and cleanup
//! - `http`: Streaming downloads

pub mod files;
pub mod http;
