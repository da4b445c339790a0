//! Site resolution middleware
//!
//! The single entry point that turns the Host header into a
//! [`RequestContext`]. Everything behind it runs inside the context's scope;
//! requests for unknown hosts stop here with "Domain Not Connected".

use crate::context::RequestContext;
use crate::error::AppError;
use crate::hostname::normalize_hostname;
use crate::state::HasServices;
use axum::{
    body::Body,
    extract::State,
    http::{header::HOST, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

/// Resolve the request's site and run the rest of the stack inside its
/// context. Bypass paths are passed through untouched.
pub async fn resolve_site_middleware<S: HasServices>(
    State(state): State<S>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let config = &state.config().resolution;
    if config.is_bypassed(request.uri().path()) {
        return next.run(request).await;
    }

    let raw_host = request_host(&request).unwrap_or_default();

    let resolution = match state.resolver().resolve_request(&raw_host, config).await {
        Ok(resolution) => resolution,
        Err(e) => return e.into_response(),
    };

    let Some(resolution) = resolution else {
        warn!(host = %raw_host, "Domain not connected");
        return AppError::DomainNotConnected(raw_host).into_response();
    };

    let hostname = normalize_hostname(&raw_host).unwrap_or_default();
    let ctx = RequestContext::new(resolution, hostname);
    debug!(
        host = %ctx.hostname,
        tenant = %ctx.tenant.slug,
        site = %ctx.site.slug,
        strategy = %ctx.strategy,
        "Resolved site"
    );

    request.extensions_mut().insert(ctx.clone());
    ctx.scope(next.run(request)).await
}

/// Host header value, falling back to the URI authority for HTTP/2 and
/// absolute-form requests.
fn request_host(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .or_else(|| request.uri().authority().map(|a| a.to_string()))
}
