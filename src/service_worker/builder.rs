//! Service worker configuration assembly and validation

use crate::error::{SwCacheError, SwCacheResult};
use crate::routing::{deduplicate, CachingStrategy, RouteConfig};
use crate::service_worker::backend::BackendIntegration;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Route list fields, in serialized form
const ROUTE_FIELDS: [&str; 4] = ["staticRoutes", "apiRoutes", "imageRoutes", "customRoutes"];

const DAY_SECS: u64 = 86_400;

/// Offline fallbacks served when both network and cache miss
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "fallback_page")]
    pub fallback_page: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "fallback_image")]
    pub fallback_image: Option<String>,
}

/// Service worker lifecycle and capability flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Features {
    #[serde(alias = "skip_waiting")]
    pub skip_waiting: bool,

    #[serde(alias = "clients_claim")]
    pub clients_claim: bool,

    #[serde(alias = "navigation_preload")]
    pub navigation_preload: bool,

    #[serde(alias = "background_sync")]
    pub background_sync: bool,

    #[serde(alias = "push_notifications")]
    pub push_notifications: bool,
}

/// Configuration handed to the service worker code generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWorkerConfig {
    /// Output path of the generated script; empty means unset
    #[serde(default)]
    pub destination: String,

    #[serde(default)]
    pub static_routes: Vec<RouteConfig>,

    #[serde(default)]
    pub api_routes: Vec<RouteConfig>,

    #[serde(default)]
    pub image_routes: Vec<RouteConfig>,

    #[serde(default)]
    pub custom_routes: Vec<RouteConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline: Option<OfflineConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_origins: Option<Vec<String>>,
}

impl ServiceWorkerConfig {
    /// All routes across the four lists
    pub fn all_routes(&self) -> impl Iterator<Item = &RouteConfig> {
        self.static_routes
            .iter()
            .chain(&self.api_routes)
            .chain(&self.image_routes)
            .chain(&self.custom_routes)
    }

    /// Validate this config
    pub fn validate(&self) -> ValidationReport {
        match serde_json::to_value(self) {
            Ok(value) => validate(&value),
            Err(e) => ValidationReport::from_errors(vec![format!("config cannot be serialized: {}", e)]),
        }
    }
}

/// Options applied when building from a backend integration
#[derive(Debug, Clone, Default)]
pub struct BuilderOptions {
    pub custom_routes: Vec<RouteConfig>,
    pub offline: Option<OfflineConfig>,
    /// Replaces the integration's feature flags
    pub features: Option<Features>,
    /// Deduplicate each route list independently
    pub deduplicate_routes: bool,
}

/// Outcome of [`validate`]; warnings never affect validity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    /// Convert into a result, keeping warnings for the caller to report
    pub fn into_result(self) -> SwCacheResult<Vec<String>> {
        if self.is_valid {
            Ok(self.warnings)
        } else {
            Err(SwCacheError::ServiceWorkerInvalid(self.errors))
        }
    }
}

/// Build a config from a backend integration's route presets
pub fn from_backend_integration(
    integration: &dyn BackendIntegration,
    destination: &str,
    options: Option<&BuilderOptions>,
) -> ServiceWorkerConfig {
    let routes = integration.generate_service_worker_config();
    let defaults = BuilderOptions::default();
    let options = options.unwrap_or(&defaults);

    let mut config = ServiceWorkerConfig {
        destination: destination.to_string(),
        static_routes: routes.static_routes,
        api_routes: routes.api_routes,
        image_routes: routes.image_routes,
        custom_routes: options.custom_routes.clone(),
        offline: options.offline.clone(),
        features: Some(options.features.clone().unwrap_or(routes.features)),
        ..ServiceWorkerConfig::default()
    };

    if options.deduplicate_routes {
        config.static_routes = deduplicate(&config.static_routes);
        config.api_routes = deduplicate(&config.api_routes);
        config.image_routes = deduplicate(&config.image_routes);
        config.custom_routes = deduplicate(&config.custom_routes);
    }

    debug!(
        "Built service worker config from {} integration: {} route(s)",
        integration.name(),
        config.all_routes().count()
    );
    config
}

/// Merge configs in order
///
/// Later configs win for `destination` (when non-empty), `offline`,
/// `security_headers`, `features` and `cors_origins`. Route lists are
/// concatenated without deduplication.
pub fn merge(configs: &[ServiceWorkerConfig]) -> SwCacheResult<ServiceWorkerConfig> {
    let (first, rest) = configs.split_first().ok_or(SwCacheError::EmptyMerge)?;
    let mut merged = first.clone();

    for config in rest {
        if !config.destination.is_empty() {
            merged.destination = config.destination.clone();
        }
        merged.static_routes.extend(config.static_routes.iter().cloned());
        merged.api_routes.extend(config.api_routes.iter().cloned());
        merged.image_routes.extend(config.image_routes.iter().cloned());
        merged.custom_routes.extend(config.custom_routes.iter().cloned());

        if config.offline.is_some() {
            merged.offline = config.offline.clone();
        }
        if config.security_headers.is_some() {
            merged.security_headers = config.security_headers.clone();
        }
        if config.features.is_some() {
            merged.features = config.features.clone();
        }
        if config.cors_origins.is_some() {
            merged.cors_origins = config.cors_origins.clone();
        }
    }

    Ok(merged)
}

fn pattern_key(route: &Value) -> Option<&str> {
    match route.get("pattern")? {
        Value::String(s) => Some(s),
        Value::Object(obj) => obj.get("regex").and_then(Value::as_str),
        _ => None,
    }
}

/// Validate a serialized service worker config
///
/// Works on untyped JSON so configs produced elsewhere can be checked too.
pub fn validate(config: &Value) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match config.get("destination") {
        Some(Value::String(dest)) if !dest.trim().is_empty() => {}
        Some(Value::String(_)) | None | Some(Value::Null) => {
            errors.push("destination is required".to_string())
        }
        Some(_) => errors.push("destination must be a string".to_string()),
    }

    let mut total_routes = 0;
    let mut pattern_counts: HashMap<&str, usize> = HashMap::new();
    let mut pattern_order: Vec<&str> = Vec::new();

    for field in ROUTE_FIELDS {
        let Some(routes) = config.get(field).and_then(Value::as_array) else {
            errors.push(format!("{} must be an array", field));
            continue;
        };
        total_routes += routes.len();
        for pattern in routes.iter().filter_map(pattern_key) {
            let count = pattern_counts.entry(pattern).or_insert(0);
            if *count == 0 {
                pattern_order.push(pattern);
            }
            *count += 1;
        }
    }

    if total_routes == 0 {
        warnings.push("No routes configured; nothing will be cached".to_string());
    }

    for pattern in pattern_order {
        if pattern_counts[pattern] > 1 {
            warnings.push(format!("Duplicate route pattern: {}", pattern));
        }
    }

    match config.get("offline").and_then(|o| o.get("fallbackPage")) {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => errors.push("offline.fallbackPage must be a string".to_string()),
    }

    for warning in &warnings {
        warn!("{}", warning);
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Starter config for projects without a detected backend integration
pub fn create_default(destination: &str) -> ServiceWorkerConfig {
    ServiceWorkerConfig {
        destination: destination.to_string(),
        static_routes: vec![
            RouteConfig::new(
                "**/*.{js,css}",
                CachingStrategy::stale_while_revalidate("static-resources")
                    .with_expiration(Some(100), Some(7 * DAY_SECS)),
            )
            .with_priority(5),
            RouteConfig::new(
                "**/*.{woff,woff2,ttf,otf}",
                CachingStrategy::cache_first("fonts").with_expiration(Some(30), Some(365 * DAY_SECS)),
            )
            .with_priority(5),
        ],
        api_routes: vec![RouteConfig::new(
            "/api/**",
            CachingStrategy::network_first("api-cache", Some(3)).with_expiration(Some(50), Some(300)),
        )
        .with_priority(10)],
        image_routes: vec![RouteConfig::new(
            "**/*.{png,jpg,jpeg,gif,svg,webp,ico}",
            CachingStrategy::cache_first("images").with_expiration(Some(60), Some(30 * DAY_SECS)),
        )],
        custom_routes: Vec::new(),
        offline: Some(OfflineConfig {
            fallback_page: Some("/offline.html".to_string()),
            fallback_image: None,
        }),
        security_headers: None,
        features: Some(Features {
            skip_waiting: true,
            clients_claim: true,
            ..Features::default()
        }),
        cors_origins: None,
    }
}
