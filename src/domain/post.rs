//! Post record and validation
//!
//! A Post is one immutable entry in the shared feed log. Posts are constructed
//! once, validated, appended, and never edited. A post with a `parent_id` is a
//! reply; everything else is a top-level post.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SmokeError};
use crate::id::{generate_post_id, is_valid_post_id};

/// Maximum post content length in characters, after normalization.
pub const MAX_CONTENT_LEN: usize = 280;

// CSI sequences, OSC sequences (BEL- or ST-terminated), and two-byte escapes.
static ESCAPE_SEQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[0-9;?]*[ -/]*[@-~]|\][^\x07\x1b]*(?:\x07|\x1b\\)?|[@-_])")
        .expect("escape sequence pattern")
});

/// One entry in the feed log.
///
/// Field names match the on-disk JSON keys exactly. `parent_id` is omitted
/// from the serialized form when absent; `project` is always written, empty
/// string included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier, `smk-` + 6 alphanumerics
    pub id: String,

    /// Who posted, conventionally `name@project` (never parsed by the store)
    pub author: String,

    /// Free-form project context, may be empty
    #[serde(default)]
    pub project: String,

    /// Short rig/version tag, required
    pub suffix: String,

    /// Message body, 1-280 characters after normalization
    pub content: String,

    /// RFC 3339 UTC timestamp, stamped at creation
    pub created_at: String,

    /// ID of the post this replies to, absent for top-level posts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Post {
    /// Create a new top-level post with a fresh ID and current timestamp.
    ///
    /// Author, project, and suffix are trimmed; content has terminal escape
    /// sequences stripped and surrounding whitespace removed before the
    /// length check.
    pub fn new(author: &str, project: &str, suffix: &str, content: &str) -> Result<Self> {
        let post = Self {
            id: generate_post_id()?,
            author: author.trim().to_string(),
            project: project.trim().to_string(),
            suffix: suffix.trim().to_string(),
            content: sanitize_content(content),
            created_at: format_timestamp(Utc::now()),
            parent_id: None,
        };
        post.validate()?;
        Ok(post)
    }

    /// Create a reply to an existing post.
    ///
    /// Only the format of `parent_id` is checked here; whether the referenced
    /// post actually exists is a store concern.
    pub fn new_reply(
        parent_id: &str,
        author: &str,
        project: &str,
        suffix: &str,
        content: &str,
    ) -> Result<Self> {
        if !is_valid_post_id(parent_id) {
            return Err(SmokeError::InvalidId(parent_id.to_string()));
        }
        let mut post = Self::new(author, project, suffix, content)?;
        post.parent_id = Some(parent_id.to_string());
        Ok(post)
    }

    /// Check every invariant a persisted post must satisfy.
    ///
    /// No side effects; safe to call on records read back from disk.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_post_id(&self.id) {
            return Err(SmokeError::InvalidId(self.id.clone()));
        }
        if self.author.trim().is_empty() {
            return Err(SmokeError::EmptyAuthor);
        }
        if self.suffix.trim().is_empty() {
            return Err(SmokeError::EmptySuffix);
        }
        if self.content.is_empty() {
            return Err(SmokeError::EmptyContent);
        }
        let len = self.content.chars().count();
        if len > MAX_CONTENT_LEN {
            return Err(SmokeError::ContentTooLong(len));
        }
        if let Some(parent) = self.parent_id.as_deref() {
            if !parent.is_empty() && !is_valid_post_id(parent) {
                return Err(SmokeError::InvalidId(parent.to_string()));
            }
        }
        Ok(())
    }

    /// True when this post replies to another post.
    pub fn is_reply(&self) -> bool {
        self.parent_id.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Parse `created_at` back to an instant. Unparseable timestamps yield
    /// `None` and sort as "never after any other post".
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Format an instant the way `created_at` is stored.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Strip terminal escape sequences and stray control characters, then trim.
pub fn sanitize_content(content: &str) -> String {
    let stripped = ESCAPE_SEQ.replace_all(content, "");
    stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Order posts newest first. Posts with unparseable timestamps sort last.
pub fn cmp_newest_first(a: &Post, b: &Post) -> Ordering {
    match (a.timestamp(), b.timestamp()) {
        (Some(ta), Some(tb)) => tb.cmp(&ta),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order posts oldest first. Posts with unparseable timestamps sort first.
pub fn cmp_oldest_first(a: &Post, b: &Post) -> Ordering {
    match (a.timestamp(), b.timestamp()) {
        (Some(ta), Some(tb)) => ta.cmp(&tb),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
