//! CLI module for smokesignal - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for initializing the feed,
//! posting, replying, and the feed/recent/show read views.

pub mod commands;

pub use commands::Cli;
