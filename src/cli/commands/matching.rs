//! Match command - resolve a URL against the configured routes

use crate::cli::args::{MatchArgs, OutputFormat};
use crate::config::Config;
use crate::error::SwCacheResult;
use crate::routing::{normalize_url, RouteConfig, RouteResolver};
use console::style;

/// Execute the match command
pub fn execute(args: MatchArgs, config: &Config) -> SwCacheResult<()> {
    let resolver = RouteResolver::new(&config.caching.routes);
    let best = resolver.best_match(&args.url);
    let all = resolver.matches(&args.url);

    match args.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "url": normalize_url(&args.url),
                "bestMatch": best,
                "matches": all,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print_text(&args.url, best, &all),
    }

    Ok(())
}

fn print_text(url: &str, best: Option<&RouteConfig>, all: &[&RouteConfig]) {
    let Some(best) = best else {
        println!("{} {}", style("No route matches").yellow(), url);
        return;
    };

    println!(
        "{} {} -> {} ({})",
        style("Best match:").green().bold(),
        best.id(),
        best.strategy.name,
        best.strategy.cache_name
    );

    if all.len() > 1 {
        println!();
        println!("{:<40} {:<22} {:>8}", style("PATTERN").bold(), style("STRATEGY").bold(), style("PRIORITY").bold());
        for route in all {
            println!(
                "{:<40} {:<22} {:>8}",
                route.id(),
                route.strategy.name.as_str(),
                route.priority
            );
        }
    }
}
