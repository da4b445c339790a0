//! HTTP middleware for Sitegate
//!
//! - Site resolution (Host header -> request context)
//! - Request ID propagation and HTTP metrics
//! - Request span construction for `TraceLayer`
//! - Path traversal guard

pub mod metrics;
pub mod path_guard;
pub mod resolve_site;
pub mod trace;

pub use metrics::ObservabilityLayer;
pub use path_guard::path_guard_middleware;
pub use resolve_site::resolve_site_middleware;
pub use trace::SanitizedMakeSpan;
