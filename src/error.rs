//! Error types for smokesignal
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// All error types that can occur in smokesignal
#[derive(Debug, Error)]
pub enum SmokeError {
    /// Post content is empty after trimming and escape stripping
    #[error("post content is empty")]
    EmptyContent,

    /// Post content exceeds the maximum length
    #[error("post content is {0} characters, maximum is 280")]
    ContentTooLong(usize),

    /// Post author is empty
    #[error("post author is empty")]
    EmptyAuthor,

    /// Post suffix tag is empty
    #[error("post suffix is empty")]
    EmptySuffix,

    /// Post or parent ID does not match the expected format
    #[error("invalid post id: {0}")]
    InvalidId(String),

    /// The feed log file does not exist yet
    #[error("feed log does not exist: {0}")]
    NotInitialized(PathBuf),

    /// No post with the given ID exists in the feed
    #[error("post not found: {0}")]
    PostNotFound(String),

    /// The secure random source failed
    #[error("id generation failed: {0}")]
    IdGeneration(String),

    /// Storage/persistence error
    #[error("storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for smokesignal operations
pub type Result<T> = std::result::Result<T, SmokeError>;
