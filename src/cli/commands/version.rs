//! Version command - print the cache version for the current tree

use super::{tracking_policy, version_path};
use crate::cli::args::{OutputFormat, VersionArgs};
use crate::config::Config;
use crate::error::SwCacheResult;
use crate::version::get_or_generate_cache_version;
use console::style;
use std::path::Path;
use tracing::info;

/// Execute the version command
pub fn execute(args: VersionArgs, config: &Config, root: &Path) -> SwCacheResult<()> {
    let version = get_or_generate_cache_version(root, &tracking_policy(root, config));

    if args.write {
        let path = version_path(root, config);
        version.save(&path)?;
        info!("Wrote cache version {} to {}", version.version, path.display());
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&version)?),
        OutputFormat::Text => {
            println!("{}", version.version);
            if !version.file_hashes.is_empty() {
                println!(
                    "{}",
                    style(format!("{} tracked file(s)", version.file_hashes.len())).dim()
                );
            }
        }
    }

    Ok(())
}
