//! Check command - decide whether cached content must be invalidated

use super::{tracking_policy, version_path};
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::config::Config;
use crate::error::{SwCacheError, SwCacheResult};
use crate::version::{should_invalidate_cache, CacheVersion};
use console::style;
use std::path::Path;
use tracing::info;

/// Execute the check command
pub fn execute(args: CheckArgs, config: &Config, root: &Path) -> SwCacheResult<()> {
    let path = version_path(root, config);
    let stored = CacheVersion::load(&path)?.ok_or_else(|| SwCacheError::VersionMissing(path.clone()))?;

    let result = should_invalidate_cache(root, &stored, &tracking_policy(root, config));

    if args.update {
        if let Some(next) = &result.next {
            next.save(&path)?;
            info!("Updated cache version {} -> {}", stored.version, next.version);
        }
    }

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.should_invalidate {
        println!("{} {}", style("Invalidate:").red().bold(), result.reason);
    } else {
        println!("{} {}", style("Keep:").green().bold(), result.reason);
    }
    println!("  Stored version: {}", stored.version);
    if let Some(new_version) = &result.new_version {
        println!("  New version:    {}", new_version);
    }
    if let Some(files) = result.changed_files.as_deref().filter(|f| !f.is_empty()) {
        println!("  Changed files:");
        for file in files {
            println!("    {}", file);
        }
    }

    Ok(())
}
