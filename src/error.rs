//! Error type for the media component.
//!
//! Route handlers map [`Error`] to HTTP responses through
//! [`crate::server::error::ApiError`], using [`Error::http_status`].

use crate::media::MediaKind;

/// Failure modes of media resolution, caching and streaming.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested file does not exist under the resolved root.
    #[error("{kind} not found: {filename}")]
    NotFound {
        /// Which directory was searched.
        kind: MediaKind,
        /// The filename as requested.
        filename: String,
    },

    /// A well-formed `Range` header that cannot be satisfied.
    #[error("Range not satisfiable for {size}-byte file")]
    RangeNotSatisfiable {
        /// Total size of the file, echoed back in `Content-Range`.
        size: u64,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::RangeNotSatisfiable { .. } => 416,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(kind: MediaKind, filename: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            filename: filename.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn not_found_display() {
        let err = Error::not_found(MediaKind::Video, "demo.mp4");
        assert_eq!(err.to_string(), "video not found: demo.mp4");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn range_not_satisfiable_status() {
        let err = Error::RangeNotSatisfiable { size: 4 };
        assert_eq!(err.http_status(), 416);
    }

    #[test]
    fn io_from_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert_matches!(err, Error::Io { .. });
        assert_eq!(err.http_status(), 500);
    }
}
