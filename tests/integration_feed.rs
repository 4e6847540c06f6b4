//! Feed round-trip integration tests
//!
//! Exercises the store, thread assembly, and recency filtering together the
//! way the CLI drives them: initialize, publish, read back, display.

use std::sync::Arc;

use chrono::{Duration, Utc};
use smokesignal::SmokeError;
use smokesignal::domain::Post;
use smokesignal::error::Result;
use smokesignal::feed::{build_threads, filter_recent};
use smokesignal::store::FeedStore;
use tempfile::TempDir;

fn fresh_store() -> (FeedStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = FeedStore::new(temp_dir.path().join("feed.jsonl"));
    store.initialize().unwrap();
    (store, temp_dir)
}

/// Integration test: publish then read back through a second store instance
#[test]
fn test_round_trip_across_instances() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("feed.jsonl");

    let post = {
        let store = FeedStore::new(path.clone());
        store.initialize()?;
        let post = Post::new("ember@boiler", "boiler", "smoke", "hello world")?;
        store.append(&post)?;
        post
    };

    {
        let store = FeedStore::new(path);
        let posts = store.read_all()?;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0], post);
        assert!(store.exists(&post.id)?);
    }

    Ok(())
}

/// Integration test: both append and read fail cleanly before init
#[test]
fn test_uninitialized_store_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let store = FeedStore::new(temp_dir.path().join("feed.jsonl"));
    let post = Post::new("ember", "", "smoke", "hello").unwrap();

    assert!(matches!(
        store.append(&post),
        Err(SmokeError::NotInitialized(_))
    ));
    assert!(matches!(
        store.read_all(),
        Err(SmokeError::NotInitialized(_))
    ));
}

/// Integration test: a seeded feed renders as threads and survives reseeding
#[test]
fn test_seeded_feed_builds_threads() -> Result<()> {
    let (store, _temp) = fresh_store();

    assert_eq!(store.seed_examples()?, 4);
    assert_eq!(store.seed_examples()?, 0);
    assert_eq!(store.count()?, 4);

    let posts = store.read_all()?;
    let threads = build_threads(&posts);

    // two top-level posts, the older one carrying both replies
    assert_eq!(threads.len(), 2);
    let with_replies: Vec<_> = threads.iter().filter(|t| !t.replies.is_empty()).collect();
    assert_eq!(with_replies.len(), 1);
    assert_eq!(with_replies[0].replies.len(), 2);

    // replies read oldest first
    let replies = &with_replies[0].replies;
    assert!(replies[0].timestamp().unwrap() < replies[1].timestamp().unwrap());

    Ok(())
}

/// Integration test: replies thread back to their parent across processes
/// (separate store instances on the same path)
#[test]
fn test_reply_flow() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("feed.jsonl");

    let writer = FeedStore::new(path.clone());
    writer.initialize()?;
    let top = Post::new("ember@boiler", "boiler", "smoke", "handing off the parser")?;
    writer.append(&top)?;

    let other = FeedStore::new(path.clone());
    assert!(other.exists(&top.id)?);
    let reply = Post::new_reply(&top.id, "ash@boiler", "boiler", "smoke", "picking it up")?;
    other.append(&reply)?;

    let reader = FeedStore::new(path);
    let threads = build_threads(&reader.read_all()?);
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].post.id, top.id);
    assert_eq!(threads[0].replies.len(), 1);
    assert_eq!(threads[0].replies[0].id, reply.id);

    Ok(())
}

/// Integration test: recency view over a freshly written feed
#[test]
fn test_recent_view() -> Result<()> {
    let (store, _temp) = fresh_store();

    // a fresh post is inside any reasonable window
    let post = Post::new("ember@boiler", "boiler", "smoke", "just now")?;
    store.append(&post)?;

    // a stale record written directly with an old timestamp
    let stale = Post {
        id: "smk-stale0".to_string(),
        author: "ash@boiler".to_string(),
        project: "boiler".to_string(),
        suffix: "smoke".to_string(),
        content: "from yesterday".to_string(),
        created_at: (Utc::now() - Duration::hours(30)).to_rfc3339(),
        parent_id: None,
    };
    store.append(&stale)?;

    let recent = filter_recent(&store.read_all()?, Duration::hours(2));
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, post.id);

    Ok(())
}

/// Integration test: corrupt lines don't take down readers or later writers
#[test]
fn test_feed_survives_corruption() -> Result<()> {
    use std::io::Write;

    let (store, _temp) = fresh_store();
    let first = Post::new("ember", "", "smoke", "before the noise")?;
    store.append(&first)?;

    {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(store.path())
            .unwrap();
        writeln!(file, "### not a record ###").unwrap();
    }

    let second = Post::new("ash", "", "smoke", "after the noise")?;
    store.append(&second)?;

    let posts = store.read_all()?;
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, first.id);
    assert_eq!(posts[1].id, second.id);
    assert_eq!(store.count()?, 2);

    Ok(())
}

/// Integration test: one shared store instance, many posting threads
#[test]
fn test_many_writers_one_store() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FeedStore::new(temp_dir.path().join("feed.jsonl")));
    store.initialize()?;

    let mut handles = Vec::new();
    for worker in 0..4 {
        let store = Arc::clone(&store);
        handles.push(std::thread::spawn(move || {
            for i in 0..10 {
                let post = Post::new(
                    &format!("agent{worker}@swarm"),
                    "swarm",
                    "smoke",
                    &format!("update {i}"),
                )
                .unwrap();
                store.append(&post).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let posts = store.read_all()?;
    assert_eq!(posts.len(), 40);

    // every surviving record still validates and carries a unique id
    let mut ids: Vec<_> = posts.iter().map(|p| p.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 40);

    Ok(())
}
