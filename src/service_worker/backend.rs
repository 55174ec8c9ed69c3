//! Backend integrations
//!
//! A backend integration knows the URL layout of a server framework and
//! supplies route presets for it. Detecting which framework a project uses
//! is left to the caller.

use crate::error::{SwCacheError, SwCacheResult};
use crate::routing::{CachingStrategy, RouteConfig};
use crate::service_worker::builder::Features;

const DAY_SECS: u64 = 86_400;

/// Raw route lists produced by a backend integration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendRoutes {
    pub static_routes: Vec<RouteConfig>,
    pub api_routes: Vec<RouteConfig>,
    pub image_routes: Vec<RouteConfig>,
    /// Lifecycle flags the framework works best with
    pub features: Features,
}

/// A server framework that can describe its own caching routes
pub trait BackendIntegration {
    /// Identifier used in configuration (e.g. "django")
    fn id(&self) -> &'static str;

    /// Display name
    fn name(&self) -> &'static str;

    /// Route presets for this framework
    fn generate_service_worker_config(&self) -> BackendRoutes;
}

/// Features shared by the built-in integrations
fn server_features() -> Features {
    Features {
        skip_waiting: true,
        clients_claim: true,
        ..Features::default()
    }
}

fn static_route(prefix: &str) -> RouteConfig {
    RouteConfig::new(
        "/static/**",
        CachingStrategy::cache_first(format!("{}-static-cache", prefix))
            .with_expiration(Some(100), Some(30 * DAY_SECS)),
    )
}

fn api_route(prefix: &str) -> RouteConfig {
    RouteConfig::new(
        "/api/**",
        CachingStrategy::network_first(format!("{}-api-cache", prefix), Some(3))
            .with_expiration(Some(50), Some(300)),
    )
}

/// Django: collected static files, user media, API and admin
#[derive(Debug, Clone, Copy, Default)]
pub struct DjangoIntegration;

impl BackendIntegration for DjangoIntegration {
    fn id(&self) -> &'static str {
        "django"
    }

    fn name(&self) -> &'static str {
        "Django"
    }

    fn generate_service_worker_config(&self) -> BackendRoutes {
        BackendRoutes {
            static_routes: vec![static_route("django")],
            api_routes: vec![
                api_route("django"),
                // Admin pages carry CSRF tokens and must never be served stale
                RouteConfig::new("/admin/**", CachingStrategy::network_only("django-admin-cache"))
                    .with_priority(10),
            ],
            image_routes: vec![RouteConfig::new(
                "/media/**",
                CachingStrategy::cache_first("django-media-cache")
                    .with_expiration(Some(50), Some(7 * DAY_SECS)),
            )],
            features: server_features(),
        }
    }
}

/// Flask: static folder and API
#[derive(Debug, Clone, Copy, Default)]
pub struct FlaskIntegration;

impl BackendIntegration for FlaskIntegration {
    fn id(&self) -> &'static str {
        "flask"
    }

    fn name(&self) -> &'static str {
        "Flask"
    }

    fn generate_service_worker_config(&self) -> BackendRoutes {
        BackendRoutes {
            static_routes: vec![static_route("flask")],
            api_routes: vec![api_route("flask")],
            image_routes: Vec::new(),
            features: server_features(),
        }
    }
}

/// Look up a built-in integration by id
pub fn backend_by_id(id: &str) -> SwCacheResult<Box<dyn BackendIntegration>> {
    match id.to_ascii_lowercase().as_str() {
        "django" => Ok(Box::new(DjangoIntegration)),
        "flask" => Ok(Box::new(FlaskIntegration)),
        _ => Err(SwCacheError::UnknownBackend(id.to_string())),
    }
}
