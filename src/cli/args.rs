//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// swcache - service worker caching policy
///
/// Resolves request URLs to caching routes, versions cached content from
/// tracked files and decides when caches must be invalidated.
#[derive(Parser, Debug)]
#[command(name = "swcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SWCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the cache version for the current tree
    Version(VersionArgs),

    /// Decide whether cached content must be invalidated
    Check(CheckArgs),

    /// List routes invalidated when a route changes
    Cascade(CascadeArgs),

    /// Resolve a URL against the configured routes
    Match(MatchArgs),

    /// Build the service worker configuration
    SwConfig(SwConfigArgs),

    /// Validate routes and service worker configuration
    Validate,
}

/// Arguments for the version command
#[derive(Parser, Debug)]
pub struct VersionArgs {
    /// Persist the version to the version file
    #[arg(short, long)]
    pub write: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Persist the new version when invalidating
    #[arg(short, long)]
    pub update: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the cascade command
#[derive(Parser, Debug)]
pub struct CascadeArgs {
    /// Route pattern that changed
    pub route: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the match command
#[derive(Parser, Debug)]
pub struct MatchArgs {
    /// Request URL, absolute or path-only
    pub url: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the sw-config command
#[derive(Parser, Debug)]
pub struct SwConfigArgs {
    /// Backend integration to take route presets from (django, flask)
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Output path of the generated service worker
    #[arg(short, long)]
    pub destination: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}
