//! Time-windowed view over a record set
//!
//! Keeps records whose timestamp falls inside the window ending now, with a
//! one-second grace at the boundary to absorb clock rounding. Future-dated
//! records are always excluded, whatever the window.

use chrono::{DateTime, Duration, Utc};

use crate::domain::Post;
use crate::domain::post::cmp_newest_first;

fn boundary_grace() -> Duration {
    Duration::seconds(1)
}

/// Filter to records within `window` of the current instant, newest first.
pub fn filter_recent(posts: &[Post], window: Duration) -> Vec<Post> {
    filter_recent_at(posts, window, Utc::now())
}

/// Pure variant of [`filter_recent`] with an explicit "now".
///
/// Records with unparseable timestamps are dropped. An empty result is a
/// normal outcome, not an error.
pub fn filter_recent_at(posts: &[Post], window: Duration, now: DateTime<Utc>) -> Vec<Post> {
    let cutoff = now - window - boundary_grace();
    let mut kept: Vec<Post> = posts
        .iter()
        .filter(|post| match post.timestamp() {
            Some(ts) => ts <= now && ts >= cutoff,
            None => false,
        })
        .cloned()
        .collect();
    kept.sort_by(cmp_newest_first);
    kept
}
