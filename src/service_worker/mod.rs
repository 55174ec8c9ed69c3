//! Service worker configuration
//!
//! Assembles route lists, offline fallbacks and feature flags into the
//! structure consumed by the service worker code generator.

pub mod backend;
pub mod builder;

pub use backend::{backend_by_id, BackendIntegration, BackendRoutes, DjangoIntegration, FlaskIntegration};
pub use builder::{
    create_default, from_backend_integration, merge, validate, BuilderOptions, Features, OfflineConfig,
    ServiceWorkerConfig, ValidationReport,
};
