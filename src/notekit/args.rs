use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notekit")]
#[command(about = "Pinboard and find/replace for your notes", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), env!("NOTEKIT_BUILD_TAG")))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (default: $NOTEKIT_DATA, then the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pin a notebook, topic or tag
    #[command(alias = "p")]
    Pin {
        /// What to pin: notebook, topic or tag
        kind: String,

        /// Id of the item
        id: String,

        /// Parent notebook id (required for topics)
        #[arg(long)]
        notebook: Option<String>,
    },

    /// Unpin an item by id
    #[command(alias = "u")]
    Unpin { id: String },

    /// List pinned items
    #[command(alias = "ls")]
    Pins,

    /// Print "yes" if the id is pinned, "no" otherwise
    IsPinned { id: String },

    /// Manage notebooks
    #[command(alias = "nb")]
    Notebook {
        #[command(subcommand)]
        action: NotebookAction,
    },

    /// Manage topics inside a notebook
    Topic {
        #[command(subcommand)]
        action: TopicAction,
    },

    /// Manage tags
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Show all notebooks, topics and tags
    Catalog,

    /// Reset the pinboard to a fresh, empty settings document
    Logout,

    /// Find (and optionally replace) text in a file
    #[command(alias = "f")]
    Find {
        /// File to search
        file: PathBuf,

        /// Search term
        term: String,

        /// Match case
        #[arg(short = 'c', long, overrides_with = "no_match_case")]
        match_case: bool,

        /// Ignore case, even if the config says otherwise
        #[arg(long, overrides_with = "match_case")]
        no_match_case: bool,

        /// Match whole words only
        #[arg(short = 'w', long, overrides_with = "no_whole_word")]
        whole_word: bool,

        /// Match inside words, even if the config says otherwise
        #[arg(long, overrides_with = "whole_word")]
        no_whole_word: bool,

        /// Treat the term as a regular expression
        #[arg(short = 'r', long, overrides_with = "no_regex")]
        regex: bool,

        /// Treat the term literally, even if the config says otherwise
        #[arg(long, overrides_with = "regex")]
        no_regex: bool,

        /// Replace with this text (the first match unless --all or --nth)
        #[arg(long)]
        replace: Option<String>,

        /// Replace every match
        #[arg(long, requires = "replace", conflicts_with = "nth")]
        all: bool,

        /// Replace only the n-th match (1-based)
        #[arg(long, requires = "replace")]
        nth: Option<usize>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., stale-pins)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotebookAction {
    /// Create a notebook
    Add { title: String },
    /// Delete a notebook and unpin it
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TopicAction {
    /// Create a topic in a notebook
    Add { notebook: String, title: String },
    /// Delete a topic and unpin it
    Rm { notebook: String, id: String },
}

#[derive(Subcommand, Debug)]
pub enum TagAction {
    /// Create a tag
    Add { title: String },
    /// Delete a tag and unpin it
    Rm { id: String },
}
