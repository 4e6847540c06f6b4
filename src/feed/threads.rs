//! Thread assembly
//!
//! Reconstructs conversation structure from a flat record stream: top-level
//! posts newest first, each followed by its replies in chronological reading
//! order. Works on any record slice; it neither reads nor writes the store.

use std::collections::HashMap;

use crate::domain::Post;
use crate::domain::post::{cmp_newest_first, cmp_oldest_first};

/// A top-level post together with its chronologically ordered replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub post: Post,
    pub replies: Vec<Post>,
}

/// Group a flat record set into threads.
///
/// Replies whose `parent_id` matches no top-level post in the input are
/// dropped; they belong to a conversation this record set cannot display.
pub fn build_threads(posts: &[Post]) -> Vec<Thread> {
    let mut top_level: Vec<Post> = Vec::new();
    let mut reply_groups: HashMap<String, Vec<Post>> = HashMap::new();

    for post in posts {
        match post.parent_id.as_deref().filter(|p| !p.is_empty()) {
            Some(parent) => reply_groups
                .entry(parent.to_string())
                .or_default()
                .push(post.clone()),
            None => top_level.push(post.clone()),
        }
    }

    top_level.sort_by(cmp_newest_first);
    top_level
        .into_iter()
        .map(|post| {
            let mut replies = reply_groups.remove(&post.id).unwrap_or_default();
            replies.sort_by(cmp_oldest_first);
            Thread { post, replies }
        })
        .collect()
}
