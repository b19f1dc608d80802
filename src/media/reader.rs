//! Whole-file reads for the data-URL cache.

use async_trait::async_trait;
use std::fmt::Debug;
use std::io;
use std::path::Path;

/// Source of file contents for [`super::MediaStore`].
///
/// Production uses [`FsReader`]; tests wrap it to count disk reads.
#[async_trait]
pub trait MediaReader: Debug + Send + Sync {
    /// Read the entire file at `path`.
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads files with `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

#[async_trait]
impl MediaReader for FsReader {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}
