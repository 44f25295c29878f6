//! Remote comment sources. The YouTube client sits behind the `http` feature.

#[cfg(feature = "http")]
pub mod youtube;

#[cfg(feature = "http")]
pub use youtube::{CommentClient, DEFAULT_BASE_URL, SyncError, parse_video_id};
