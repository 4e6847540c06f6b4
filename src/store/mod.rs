//! Append-only feed log storage
//!
//! One `FeedStore` owns one newline-delimited JSON file. Any number of
//! processes may append to the same path concurrently; writers are serialized
//! by an in-process mutex first and an OS advisory exclusive lock on the file
//! second. The mutex orders logical writers inside one process, the file lock
//! is what makes appends safe across processes.
//!
//! Reads take no lock at all. A reader racing a writer in another process
//! either sees a committed whole line or nothing, because writers only append
//! complete lines and fsync before releasing the lock; the newest record may
//! simply not be visible yet.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Duration, Utc};

use crate::domain::Post;
use crate::domain::post::{cmp_newest_first, format_timestamp};
use crate::error::{Result, SmokeError};
use crate::id::generate_post_id;

/// How far in the past the first seeded post is stamped.
const SEED_BACKDATE_MINUTES: i64 = 45;

/// Canonical demonstration posts for a fresh feed: a short two-author
/// exchange plus a second standalone post, staggered one minute apart so
/// they read as a plausible conversation. `reply_to` indexes into this
/// table.
const SEED_POSTS: [(&str, &str, &str, &str, Option<usize>); 4] = [
    (
        "ember@boiler",
        "boiler",
        "smoke",
        "first light: shared feed is up. post here when you hand work off.",
        None,
    ),
    (
        "ash@boiler",
        "boiler",
        "smoke",
        "receiving loud and clear. parser branch is green, picking up review next.",
        Some(0),
    ),
    (
        "cinder@kiln",
        "kiln",
        "v2",
        "kiln ingest is back on the backlog, should be caught up within the hour.",
        Some(0),
    ),
    (
        "flint@forge",
        "forge",
        "rc1",
        "forge rc1 cut and tagged. shout if anything smells off overnight.",
        None,
    ),
];

/// Store for the shared append-only feed log.
///
/// All operations are relative to the single bound file path. The file's
/// existence is the sole "initialized" signal; there is no separate marker.
pub struct FeedStore {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl FeedStore {
    /// Bind a store to a log file path. No I/O happens until an operation
    /// is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// The bound log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the log file (and parent directories) if it does not exist.
    ///
    /// Idempotent. Returns true when the file was created by this call.
    pub fn initialize(&self) -> Result<bool> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate and durably append one post to the log.
    ///
    /// Two concurrent appends, same process or not, never interleave bytes
    /// within a record and neither is lost.
    pub fn append(&self, post: &Post) -> Result<()> {
        post.validate()?;
        let _guard = self
            .append_lock
            .lock()
            .map_err(|e| SmokeError::Storage(e.to_string()))?;
        self.append_to_log(post)
    }

    /// The shared write path under the append mutex: existence check, open
    /// for append, blocking exclusive file lock, write one line, fsync.
    fn append_to_log(&self, post: &Post) -> Result<()> {
        if !self.path.exists() {
            return Err(SmokeError::NotInitialized(self.path.clone()));
        }

        let line = serde_json::to_string(post)?;

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        // Advisory exclusive lock, blocks until other processes release.
        // Closing the file releases it on every exit path.
        file.lock()?;
        let written = writeln!(file, "{line}").and_then(|_| file.sync_all());
        let unlocked = file.unlock();
        written?;
        unlocked?;
        Ok(())
    }

    /// Read every surviving record in file order.
    ///
    /// Takes no lock. Blank lines are ignored; lines that fail to parse or
    /// validate are skipped with a warning rather than failing the read.
    pub fn read_all(&self) -> Result<Vec<Post>> {
        if !self.path.exists() {
            return Err(SmokeError::NotInitialized(self.path.clone()));
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut posts = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let post: Post = match serde_json::from_str(trimmed) {
                Ok(post) => post,
                Err(e) => {
                    log::warn!(
                        "skipping malformed line {} in {}: {}",
                        index + 1,
                        self.path.display(),
                        e
                    );
                    continue;
                }
            };
            if let Err(e) = post.validate() {
                log::warn!(
                    "skipping invalid post on line {} in {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                );
                continue;
            }
            posts.push(post);
        }
        Ok(posts)
    }

    /// Read all records sorted newest first, truncated to `limit` when
    /// `limit > 0`. Records with unparseable timestamps land at the end.
    pub fn read_recent(&self, limit: usize) -> Result<Vec<Post>> {
        let mut posts = self.read_all()?;
        posts.sort_by(cmp_newest_first);
        if limit > 0 && posts.len() > limit {
            posts.truncate(limit);
        }
        Ok(posts)
    }

    /// Find a post by exact ID.
    pub fn find_by_id(&self, id: &str) -> Result<Post> {
        self.read_all()?
            .into_iter()
            .find(|post| post.id == id)
            .ok_or_else(|| SmokeError::PostNotFound(id.to_string()))
    }

    /// Whether a post with the given ID exists in the feed.
    pub fn exists(&self, id: &str) -> Result<bool> {
        match self.find_by_id(id) {
            Ok(_) => Ok(true),
            Err(SmokeError::PostNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Number of surviving records in the feed.
    pub fn count(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }

    /// Populate a truly empty feed with the canonical demonstration posts.
    ///
    /// Idempotent: a feed that already has any record is left untouched and
    /// 0 is returned. Otherwise the seed posts are appended through the same
    /// write path as `append`, backdated with a one-minute stagger so their
    /// relative order is deterministic, and the appended count is returned.
    pub fn seed_examples(&self) -> Result<usize> {
        let _guard = self
            .append_lock
            .lock()
            .map_err(|e| SmokeError::Storage(e.to_string()))?;

        if !self.read_all()?.is_empty() {
            return Ok(0);
        }

        let base = Utc::now() - Duration::minutes(SEED_BACKDATE_MINUTES);
        let mut ids: Vec<String> = Vec::with_capacity(SEED_POSTS.len());
        for (index, (author, project, suffix, content, reply_to)) in SEED_POSTS.iter().enumerate() {
            let post = Post {
                id: generate_post_id()?,
                author: (*author).to_string(),
                project: (*project).to_string(),
                suffix: (*suffix).to_string(),
                content: (*content).to_string(),
                created_at: format_timestamp(base + Duration::minutes(index as i64)),
                parent_id: reply_to.map(|i| ids[i].clone()),
            };
            post.validate()?;
            self.append_to_log(&post)?;
            ids.push(post.id);
        }
        Ok(ids.len())
    }
}
