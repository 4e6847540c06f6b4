//! smokesignal - a shared append-only message feed
//!
//! Multiple agent processes post short messages to one newline-delimited JSON
//! log and read them back as threaded conversations. The library covers the
//! persistence and retrieval core: the record type and its validation, ID
//! generation, the cross-process append path, tolerant reads, thread
//! assembly, and recency filtering. Rendering lives in the binary.

pub mod domain;
pub mod error;
pub mod feed;
pub mod id;
pub mod store;

pub use error::{Result, SmokeError};
