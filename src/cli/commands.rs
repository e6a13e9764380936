use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "ramblog")]
#[command(version, about = "A small self-hosted memo service")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServerConfig),

    /// List memos, newest first
    List {
        #[arg(short = 'd', long = "data", env = "RAMBLOG_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,

        /// Only memos carrying this tag
        #[arg(long = "tag", short = 't')]
        tag: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single memo
    Get {
        /// Memo ID, e.g. 2024-01-01-1
        id: String,

        #[arg(short = 'd', long = "data", env = "RAMBLOG_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new memo
    Add {
        /// Memo title
        title: String,

        /// Tags (can be specified multiple times)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Read content from stdin
        #[arg(long)]
        stdin: bool,

        #[arg(short = 'd', long = "data", env = "RAMBLOG_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update an existing memo. Omitted fields are left unchanged.
    Update {
        /// Memo ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Replace the tag list (can be specified multiple times)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Read new content from stdin
        #[arg(long)]
        stdin: bool,

        #[arg(short = 'd', long = "data", env = "RAMBLOG_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a memo
    Delete {
        /// Memo ID
        id: String,

        #[arg(short = 'd', long = "data", env = "RAMBLOG_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,
    },

    /// List all tags in use
    Tags {
        #[arg(short = 'd', long = "data", env = "RAMBLOG_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
