//! CLI argument definitions for the topfive binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use topfive::SortKey;

/// Top-5 lists server
#[derive(Parser, Debug)]
#[command(name = "topfive")]
#[command(about = "Top-5 lists: rank five things, publish them, see what the community thinks")]
#[command(version)]
pub struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Check health of a running server
    Health(HealthArgs),
    /// Print the community rankings stored in a data directory
    Community(CommunityArgs),
}

/// Where the JSON data files live
#[derive(clap::Args, Debug, Clone)]
pub struct DataArgs {
    /// Data directory holding lists.json and users.json
    #[arg(short = 'D', long, env = "TOPFIVE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "TOPFIVE_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "TOPFIVE_HOST")]
    pub host: String,

    #[command(flatten)]
    pub data: DataArgs,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the server to check
    #[arg(short, long, default_value = "http://127.0.0.1:3000", env = "TOPFIVE_URL")]
    pub url: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}

/// Arguments for the community command
#[derive(clap::Args, Debug)]
pub struct CommunityArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Only show entries whose name starts with this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort order: newest, oldest, views, likes or dislikes
    #[arg(long)]
    pub sort: Option<SortKey>,
}
