//! Sw-config command - build the service worker configuration

use crate::cli::args::SwConfigArgs;
use crate::config::Config;
use crate::error::SwCacheResult;
use crate::service_worker::{
    backend_by_id, create_default, from_backend_integration, merge, ServiceWorkerConfig,
};
use console::style;
use tracing::debug;

/// Execute the sw-config command
pub fn execute(args: SwConfigArgs, config: &Config) -> SwCacheResult<()> {
    let built = build(&args, config)?;

    let warnings = built.validate().into_result()?;
    for warning in &warnings {
        eprintln!("{} {}", style("Warning:").yellow(), warning);
    }

    println!("{}", serde_json::to_string_pretty(&built)?);
    Ok(())
}

/// Generated routes merged with the `[service_worker]` section
pub(crate) fn build(args: &SwConfigArgs, config: &Config) -> SwCacheResult<ServiceWorkerConfig> {
    let settings = &config.service_worker;
    let destination = args
        .destination
        .clone()
        .unwrap_or_else(|| settings.destination.clone());

    let mut layers = Vec::with_capacity(3);
    match args.backend.as_deref().or(settings.backend.as_deref()) {
        Some(id) => {
            let integration = backend_by_id(id)?;
            debug!("Using {} route presets", integration.name());
            layers.push(from_backend_integration(
                integration.as_ref(),
                &destination,
                Some(&settings.builder_options()),
            ));
        }
        None => {
            let options = settings.builder_options();
            let mut base = create_default(&destination);
            base.custom_routes = options.custom_routes;
            layers.push(base);
            layers.push(ServiceWorkerConfig {
                offline: options.offline,
                features: options.features,
                ..ServiceWorkerConfig::default()
            });
        }
    }

    let mut overrides = settings.overrides();
    overrides.destination = destination;
    layers.push(overrides);

    merge(&layers)
}
