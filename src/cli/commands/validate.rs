//! Validate command - check routes and service worker configuration

use super::sw_config;
use crate::cli::args::SwConfigArgs;
use crate::config::Config;
use crate::error::{SwCacheError, SwCacheResult};
use crate::routing::glob::has_wildcard;
use crate::routing::{compile, RoutePattern};
use console::{style, Emoji};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

/// Execute the validate command
///
/// Malformed routes are already rejected while loading the config, so
/// this reports on what loaded successfully.
pub fn execute(config: &Config) -> SwCacheResult<()> {
    println!("{}", style("Routes:").bold());
    let routes = &config.caching.routes;
    println!("  {}{} route(s) configured", CHECK, routes.len());

    for route in routes {
        if let RoutePattern::Glob(glob) = &route.pattern {
            if has_wildcard(glob) && compile(glob).is_literal() {
                println!("  {}{} does not compile; matched literally", WARN, glob);
            }
        }
        for dependency in &route.dependencies {
            if !routes.iter().any(|r| r.id() == dependency) {
                println!(
                    "  {}{} depends on unconfigured route {}",
                    WARN,
                    route.id(),
                    dependency
                );
            }
        }
    }

    println!();
    println!("{}", style("Service worker:").bold());
    let built = sw_config::build(
        &SwConfigArgs {
            backend: None,
            destination: None,
        },
        config,
    )?;
    let report = built.validate();

    for warning in &report.warnings {
        println!("  {}{}", WARN, warning);
    }
    for error in &report.errors {
        println!("  {}{}", CROSS, style(error).red());
    }

    if !report.is_valid {
        return Err(SwCacheError::ServiceWorkerInvalid(report.errors));
    }

    println!("  {}{} -> {}", CHECK, built.destination, style("valid").green());
    Ok(())
}
