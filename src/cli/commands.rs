//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - init: create the shared feed log
//! - post/reply: publish messages
//! - feed/recent/show: read views
//! - status, seed: maintenance

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// smokesignal - a shared message feed for agents working side by side
#[derive(Parser, Debug)]
#[command(name = "smokesignal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Feed log file, overrides the configured path
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the feed log file if it does not exist yet
    Init,

    /// Publish a new top-level post
    Post {
        /// Message content (1-280 characters)
        content: String,

        /// Author handle, defaults to your OS username
        #[arg(short, long)]
        author: Option<String>,

        /// Project context
        #[arg(short, long)]
        project: Option<String>,

        /// Short rig/version tag
        #[arg(short, long, default_value = "cli")]
        suffix: String,
    },

    /// Publish a reply to an existing post
    Reply {
        /// ID of the post being replied to
        parent_id: String,

        /// Message content (1-280 characters)
        content: String,

        /// Author handle, defaults to your OS username
        #[arg(short, long)]
        author: Option<String>,

        /// Project context
        #[arg(short, long)]
        project: Option<String>,

        /// Short rig/version tag
        #[arg(short, long, default_value = "cli")]
        suffix: String,
    },

    /// Show the feed as threaded conversations (default command)
    Feed {
        /// Maximum number of threads to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show posts from the last few hours, newest first
    Recent {
        /// Window size in hours
        #[arg(long)]
        hours: Option<u32>,

        /// Maximum number of posts to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a single post by ID
    Show {
        /// Post ID to look up
        id: String,
    },

    /// Show the feed path and record count
    Status,

    /// Populate an empty feed with example posts
    Seed,
}
