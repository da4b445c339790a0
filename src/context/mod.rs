//! Request-scoped tenant/site context
//!
//! The context is established by the resolution middleware for exactly one
//! request and lives in a task-local slot. It is visible to everything the
//! request's task awaits and is released when that future completes, is
//! dropped, or unwinds. Work spawned onto other tasks does not inherit it and
//! must either establish its own scope or use the unscoped accessors.

pub mod scope;

pub use scope::{ScopedQuery, SiteScope};

use crate::domain::{Site, StringUuid, Tenant};
use crate::error::AppError;
use crate::service::resolver::{Resolution, ResolutionStrategy};
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Serialize;
use std::future::Future;

tokio::task_local! {
    static CURRENT: RequestContext;
}

/// The resolved (tenant, site) pair for one request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub tenant: Tenant,
    pub site: Site,
    /// Normalized hostname the request arrived on
    pub hostname: String,
    pub strategy: ResolutionStrategy,
}

impl RequestContext {
    pub fn new(resolution: Resolution, hostname: impl Into<String>) -> Self {
        Self {
            tenant: resolution.tenant,
            site: resolution.site,
            hostname: hostname.into(),
            strategy: resolution.strategy,
        }
    }

    pub fn site_id(&self) -> StringUuid {
        self.site.id
    }

    pub fn tenant_id(&self) -> StringUuid {
        self.tenant.id
    }

    /// Run `fut` with this context as the current one.
    ///
    /// Always starts from a fresh slot, shadowing anything the caller might
    /// have had, and the slot is gone once `fut` finishes or unwinds.
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(self, fut).await
    }

    /// Synchronous counterpart of [`RequestContext::scope`].
    pub fn sync_scope<F, R>(self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT.sync_scope(self, f)
    }

    /// Snapshot of the current context, if one is established.
    pub fn current() -> Option<RequestContext> {
        CURRENT.try_with(|ctx| ctx.clone()).ok()
    }

    /// Borrow the current context without cloning it.
    pub fn with_current<R>(f: impl FnOnce(&RequestContext) -> R) -> Option<R> {
        CURRENT.try_with(f).ok()
    }

    pub fn is_set() -> bool {
        CURRENT.try_with(|_| ()).is_ok()
    }

    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            tenant_id: self.tenant.id,
            tenant_slug: self.tenant.slug.clone(),
            site_id: self.site.id,
            site_slug: self.site.slug.clone(),
            site_status: self.site.status.to_string(),
            hostname: self.hostname.clone(),
            strategy: self.strategy,
        }
    }
}

/// Serializable view of the current context for downstream consumers
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct ContextSummary {
    pub tenant_id: StringUuid,
    pub tenant_slug: String,
    pub site_id: StringUuid,
    pub site_slug: String,
    pub site_status: String,
    pub hostname: String,
    pub strategy: ResolutionStrategy,
}

/// Extractor for the request's resolved context.
///
/// Handlers behind the resolution middleware always have one; a missing
/// context is a wiring bug and is reported as a server error.
#[derive(Debug, Clone)]
pub struct CurrentSite(pub RequestContext);

impl<S> FromRequestParts<S> for CurrentSite
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(CurrentSite)
            .ok_or(AppError::SiteContextMissing)
    }
}
