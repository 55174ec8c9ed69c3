//! swcache - Service worker caching policy
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use swcache::cli::{commands, Cli, Commands};
use swcache::config::ConfigManager;
use swcache::error::{SwCacheError, SwCacheResult};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> SwCacheResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("swcache=warn"),
        1 => EnvFilter::new("swcache=info"),
        _ => EnvFilter::new("swcache=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let project = match cli.project {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| SwCacheError::io("getting current directory", e))?,
    };
    if !project.is_dir() {
        return Err(SwCacheError::PathNotFound(project));
    }
    let root = project
        .canonicalize()
        .map_err(|e| SwCacheError::io(format!("resolving {}", project.display()), e))?;

    // Explicit --config must exist; discovered configs fall back to defaults
    let config_manager = match cli.config {
        Some(path) => {
            if !path.is_file() {
                return Err(SwCacheError::ConfigNotFound(path));
            }
            ConfigManager::with_path(path)
        }
        None => match ConfigManager::find_local_config(&root) {
            Some(path) => {
                debug!("Found local config: {}", path.display());
                ConfigManager::with_path(path)
            }
            None => ConfigManager::new(),
        },
    };
    let config = config_manager.load()?;

    match cli.command {
        Commands::Version(args) => commands::version(args, &config, &root),
        Commands::Check(args) => commands::check(args, &config, &root),
        Commands::Cascade(args) => commands::cascade(args, &config),
        Commands::Match(args) => commands::matching(args, &config),
        Commands::SwConfig(args) => commands::sw_config(args, &config),
        Commands::Validate => commands::validate(&config),
    }
}
