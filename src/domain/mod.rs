//! Domain types for the feed.

pub mod post;

pub use post::{MAX_CONTENT_LEN, Post};
