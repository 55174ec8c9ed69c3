//! Cascade command - list routes invalidated by a change

use crate::cli::args::{CascadeArgs, OutputFormat};
use crate::config::Config;
use crate::dependency::{build_dependency_graph, get_cascade_invalidation};
use crate::error::{SwCacheError, SwCacheResult};
use console::style;

/// Execute the cascade command
pub fn execute(args: CascadeArgs, config: &Config) -> SwCacheResult<()> {
    let routes = &config.caching.routes;
    let graph = build_dependency_graph(routes);

    let known = routes.iter().any(|r| r.id() == args.route) || !graph.dependents_of(&args.route).is_empty();
    if !known {
        return Err(SwCacheError::RouteNotFound(args.route));
    }

    let invalidated = get_cascade_invalidation(&args.route, &graph);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&invalidated)?),
        OutputFormat::Text => {
            println!(
                "{} {} route(s) invalidated by {}",
                style("Cascade:").bold(),
                invalidated.len(),
                style(&args.route).cyan()
            );
            for route in &invalidated {
                println!("  {}", route);
            }
        }
    }

    Ok(())
}
