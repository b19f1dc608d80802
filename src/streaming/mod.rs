//! Media streaming module.
//!
//! Direct byte streaming for single files with HTTP range support, used for
//! video scrubbing and audio seeking.
//!
//! # Routes
//!
//! - `GET /videos/{filename}` - video file, `video/mp4`
//! - `GET /audio/{filename}` - audio file, `audio/mpeg` or `audio/aac`

mod direct;
pub mod range;

pub use direct::{stream_file, StreamSettings};
pub use range::{parse_range_header, ByteRange, RangeSpec};
