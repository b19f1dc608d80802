//! Direct streaming with HTTP range requests.
//!
//! Serves media files straight from disk in bounded chunks. Unlike the data-URL
//! catalog, nothing here is cached or held in memory beyond one chunk.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::range::parse_range_header;
use crate::error::{Error, Result};
use crate::media::{MediaKind, MediaRoot};

/// Tunables for streamed responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    /// Bytes read from disk per body chunk.
    pub chunk_size: usize,
    /// `Cache-Control` max-age in seconds; zero omits the header.
    pub cache_max_age_secs: u64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
            cache_max_age_secs: 0,
        }
    }
}

/// Serve `filename` of `kind`, honoring an optional `Range` header value.
///
/// Returns [`Error::NotFound`] without building a response when the file is
/// missing, and [`Error::RangeNotSatisfiable`] for a well-formed range outside
/// the file. Malformed range headers are ignored.
pub async fn stream_file(
    root: &MediaRoot,
    kind: MediaKind,
    filename: &str,
    range_header: Option<&str>,
    settings: &StreamSettings,
) -> Result<Response> {
    let not_found = || Error::not_found(kind, filename);

    let file_path = root.file_path(kind, filename).ok_or_else(not_found)?;

    let metadata = tokio::fs::metadata(&file_path)
        .await
        .map_err(|_| not_found())?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    let file_size = metadata.len();
    let content_type = kind.mime_type(filename);

    let range = match range_header.and_then(parse_range_header) {
        Some(spec) => Some(
            spec.resolve(file_size)
                .ok_or(Error::RangeNotSatisfiable { size: file_size })?,
        ),
        None => None,
    };

    let mut file = File::open(&file_path).await.map_err(|_| not_found())?;

    let mut builder = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes");
    if settings.cache_max_age_secs > 0 {
        builder = builder.header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", settings.cache_max_age_secs),
        );
    }

    // The body owns the file; dropping it on client abort closes the handle.
    match range {
        Some(range) => {
            tracing::debug!(
                %kind,
                filename,
                range = %range,
                size = file_size,
                "Serving partial content"
            );

            file.seek(SeekFrom::Start(range.start)).await?;
            let stream = ReaderStream::with_capacity(file.take(range.len()), settings.chunk_size);

            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_LENGTH, range.len().to_string())
                .header(header::CONTENT_RANGE, range.content_range(file_size))
                .body(Body::from_stream(stream))
                .map_err(|e| Error::Internal(format!("Failed to build response: {e}")))
        }
        None => {
            tracing::debug!(%kind, filename, size = file_size, "Serving full file");

            let stream = ReaderStream::with_capacity(file, settings.chunk_size);

            builder
                .status(StatusCode::OK)
                .header(header::CONTENT_LENGTH, file_size.to_string())
                .body(Body::from_stream(stream))
                .map_err(|e| Error::Internal(format!("Failed to build response: {e}")))
        }
    }
}
