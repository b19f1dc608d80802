//! HTTP `Range` header handling.
//!
//! Parsing is split from resolution: [`parse_range_header`] only checks syntax,
//! [`RangeSpec::resolve`] checks the request against the file size. A header
//! that does not parse is ignored and the whole file is served; one that
//! parses but cannot be satisfied is answered with `416`.

use std::fmt;

/// A single syntactically valid byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// `bytes=START-END`
    Bounded { start: u64, end: u64 },
    /// `bytes=START-`
    From { start: u64 },
    /// `bytes=-LEN` (last LEN bytes)
    Suffix { len: u64 },
}

/// Inclusive byte range within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered; a resolved range is never empty.
    pub(crate) fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a file of `size` bytes.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parse a `Range` header value.
///
/// Supports formats:
/// - bytes=0-499
/// - bytes=500-
/// - bytes=-500 (last 500 bytes)
///
/// Multi-range requests, other units and non-numeric bounds return `None`.
pub fn parse_range_header(value: &str) -> Option<RangeSpec> {
    let spec = value.trim().strip_prefix("bytes=")?;
    if spec.contains(',') {
        return None;
    }

    let (start, end) = spec.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());

    match (start.is_empty(), end.is_empty()) {
        (true, false) => Some(RangeSpec::Suffix {
            len: parse_bound(end)?,
        }),
        (false, true) => Some(RangeSpec::From {
            start: parse_bound(start)?,
        }),
        (false, false) => Some(RangeSpec::Bounded {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        }),
        (true, true) => None,
    }
}

fn parse_bound(s: &str) -> Option<u64> {
    // u64::from_str accepts a leading '+', which is not valid here.
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl RangeSpec {
    /// Resolve against a file of `size` bytes.
    ///
    /// An end past the file is clamped to the last byte. Returns `None` when
    /// the range is unsatisfiable: start past the end of the file, start
    /// after end, an empty suffix, or any range on an empty file.
    pub fn resolve(self, size: u64) -> Option<ByteRange> {
        if size == 0 {
            return None;
        }
        let last = size - 1;

        let (start, end) = match self {
            RangeSpec::Bounded { start, end } => (start, end.min(last)),
            RangeSpec::From { start } => (start, last),
            RangeSpec::Suffix { len } => {
                if len == 0 {
                    return None;
                }
                (size.saturating_sub(len), last)
            }
        };

        if start > last || start > end {
            return None;
        }

        Some(ByteRange { start, end })
    }
}
