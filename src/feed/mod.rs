//! Presentation-independent views over a flat set of feed records.

pub mod recent;
pub mod threads;

pub use recent::{filter_recent, filter_recent_at};
pub use threads::{Thread, build_threads};
