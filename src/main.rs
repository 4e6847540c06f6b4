use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

use smokesignal::SmokeError;
use smokesignal::domain::Post;
use smokesignal::feed::{build_threads, filter_recent};
use smokesignal::store::FeedStore;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smokesignal")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("smokesignal.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    let store = open_store(cli, config);

    if cli.is_verbose() {
        println!("{}", format!("feed log: {}", store.path().display()).yellow());
    }

    match &cli.command {
        None => {
            // Default: show the threaded feed
            handle_feed_command(&store, config.display.feed_limit)
        }
        Some(Commands::Init) => handle_init_command(&store),
        Some(Commands::Post {
            content,
            author,
            project,
            suffix,
        }) => handle_post_command(&store, content, author.as_deref(), project.as_deref(), suffix),
        Some(Commands::Reply {
            parent_id,
            content,
            author,
            project,
            suffix,
        }) => handle_reply_command(
            &store,
            parent_id,
            content,
            author.as_deref(),
            project.as_deref(),
            suffix,
        ),
        Some(Commands::Feed { limit }) => {
            handle_feed_command(&store, limit.unwrap_or(config.display.feed_limit))
        }
        Some(Commands::Recent { hours, limit }) => handle_recent_command(
            &store,
            hours.unwrap_or(config.display.recent_hours),
            limit.unwrap_or(0),
        ),
        Some(Commands::Show { id }) => handle_show_command(&store, id),
        Some(Commands::Status) => handle_status_command(&store),
        Some(Commands::Seed) => handle_seed_command(&store),
    }
}

fn open_store(cli: &Cli, config: &Config) -> FeedStore {
    let path = cli
        .file
        .clone()
        .unwrap_or_else(|| config.feed.path.clone());
    FeedStore::new(path)
}

/// Map core errors to user-facing reports; the absent-file sentinel gets an
/// actionable hint, everything else surfaces verbatim.
fn report(err: SmokeError) -> eyre::Report {
    match err {
        SmokeError::NotInitialized(path) => eyre::eyre!(
            "no feed log at {} - run `smokesignal init` first",
            path.display()
        ),
        other => eyre::Report::new(other),
    }
}

fn resolve_author(author: Option<&str>) -> String {
    match author {
        Some(author) => author.to_string(),
        None => std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "anon".to_string()),
    }
}

fn render_post(post: &Post, indented: bool) {
    let indent = if indented { "    " } else { "" };
    let stamp = post
        .timestamp()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| post.created_at.clone());
    println!(
        "{}{} {} {} {}",
        indent,
        post.id.dimmed(),
        post.author.cyan().bold(),
        format!("[{}]", post.suffix).yellow(),
        stamp.dimmed()
    );
    for line in post.content.lines() {
        println!("{}{}", indent, line);
    }
}

fn handle_init_command(store: &FeedStore) -> Result<()> {
    info!("Initializing feed at {}", store.path().display());
    let created = store.initialize().map_err(report)?;
    if created {
        println!("{} {}", "Initialized feed:".green(), store.path().display());
    } else {
        println!(
            "{} {}",
            "Feed already exists:".yellow(),
            store.path().display()
        );
    }
    Ok(())
}

fn handle_post_command(
    store: &FeedStore,
    content: &str,
    author: Option<&str>,
    project: Option<&str>,
    suffix: &str,
) -> Result<()> {
    let author = resolve_author(author);
    let post =
        Post::new(&author, project.unwrap_or(""), suffix, content).map_err(report)?;
    store.append(&post).map_err(report)?;
    info!("Posted {} as {}", post.id, post.author);
    println!("{} {}", "Posted:".green(), post.id);
    Ok(())
}

fn handle_reply_command(
    store: &FeedStore,
    parent_id: &str,
    content: &str,
    author: Option<&str>,
    project: Option<&str>,
    suffix: &str,
) -> Result<()> {
    if !store.exists(parent_id).map_err(report)? {
        return Err(eyre::eyre!("post not found: {parent_id}"));
    }
    let author = resolve_author(author);
    let post = Post::new_reply(parent_id, &author, project.unwrap_or(""), suffix, content)
        .map_err(report)?;
    store.append(&post).map_err(report)?;
    info!("Posted reply {} to {}", post.id, parent_id);
    println!("{} {} -> {}", "Replied:".green(), post.id, parent_id);
    Ok(())
}

fn handle_feed_command(store: &FeedStore, limit: usize) -> Result<()> {
    let posts = store.read_all().map_err(report)?;
    let mut threads = build_threads(&posts);
    if limit > 0 && threads.len() > limit {
        threads.truncate(limit);
    }

    if threads.is_empty() {
        println!("{}", "The feed is empty.".dimmed());
        return Ok(());
    }

    for thread in &threads {
        render_post(&thread.post, false);
        for reply in &thread.replies {
            render_post(reply, true);
        }
        println!();
    }
    Ok(())
}

fn handle_recent_command(store: &FeedStore, hours: u32, limit: usize) -> Result<()> {
    let posts = store.read_all().map_err(report)?;
    let mut recent = filter_recent(&posts, chrono::Duration::hours(i64::from(hours)));
    if limit > 0 && recent.len() > limit {
        recent.truncate(limit);
    }

    if recent.is_empty() {
        println!("{}", format!("Nothing in the last {hours}h.").dimmed());
        return Ok(());
    }

    for post in &recent {
        render_post(post, false);
    }
    Ok(())
}

fn handle_show_command(store: &FeedStore, id: &str) -> Result<()> {
    let post = store.find_by_id(id).map_err(report)?;
    render_post(&post, false);
    if let Some(parent) = post.parent_id.as_deref().filter(|p| !p.is_empty()) {
        println!("{}", format!("in reply to {parent}").dimmed());
    }
    Ok(())
}

fn handle_status_command(store: &FeedStore) -> Result<()> {
    let count = store.count().map_err(report)?;
    println!("{} {}", "Feed:".green(), store.path().display());
    println!("{} {}", "Posts:".green(), count);
    Ok(())
}

fn handle_seed_command(store: &FeedStore) -> Result<()> {
    let seeded = store.seed_examples().map_err(report)?;
    if seeded > 0 {
        println!("{} {} example posts", "Seeded:".green(), seeded);
    } else {
        println!("{}", "Feed already has posts, nothing to seed.".yellow());
    }
    Ok(())
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Run the main application logic
    run_application(&cli, &config)
}
