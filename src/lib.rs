//! Showreel - media delivery for the agency marketing site
//!
//! Resolves the site's public root, serves its demo videos and audio samples
//! as cached data URLs, and streams individual files with HTTP range support.

pub mod config;
pub mod error;
pub mod media;
pub mod server;
pub mod streaming;

pub use error::{Error, Result};
