//! Host-to-site resolution
//!
//! Strategies run in a fixed order and the first hit wins:
//!
//! 1. exact domain match
//! 2. `www.` <-> apex fallback
//! 3. one-level subdomain pattern (opt-in per site)
//! 4. legacy tenant hostname
//!
//! A hostname bound to a disabled site (or to a site of a disabled tenant)
//! resolves to nothing, and later strategies are not tried for it. Callers
//! cannot tell "disabled" apart from "unknown".

use crate::config::ResolutionConfig;
use crate::domain::{Domain, Site, Tenant};
use crate::error::Result;
use crate::hostname::{
    is_localhost, localhost_subdomain, normalize_hostname, parent_domain, strip_www, with_www,
};
use crate::repository::{DomainRepository, SiteRepository, TenantRepository};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Which strategy produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    Exact,
    /// Apex request matched a registered `www.` hostname
    WwwFallback,
    /// `www.` request matched a registered apex hostname
    ApexFallback,
    SubdomainPattern,
    LegacyTenant,
    LocalDevelopment,
}

impl ResolutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStrategy::Exact => "exact",
            ResolutionStrategy::WwwFallback => "www_fallback",
            ResolutionStrategy::ApexFallback => "apex_fallback",
            ResolutionStrategy::SubdomainPattern => "subdomain_pattern",
            ResolutionStrategy::LegacyTenant => "legacy_tenant",
            ResolutionStrategy::LocalDevelopment => "local_development",
        }
    }
}

impl std::fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tenant: Tenant,
    pub site: Site,
    /// The directory row that matched, if the strategy used one
    pub domain: Option<Domain>,
    pub strategy: ResolutionStrategy,
}

/// Outcome of one directory lookup
enum Lookup {
    Miss,
    /// The hostname is bound, but to a disabled site or tenant. Terminal.
    Blocked(Site),
    Hit(Resolution),
}

/// Tenant slug addressed by a development-only localhost hostname.
pub fn local_tenant_slug<'a>(hostname: &'a str, root_tenant_slug: &'a str) -> Option<&'a str> {
    if is_localhost(hostname) {
        Some(root_tenant_slug)
    } else {
        localhost_subdomain(hostname)
    }
}

pub struct DomainResolver<T: TenantRepository, S: SiteRepository, D: DomainRepository> {
    tenant_repo: Arc<T>,
    site_repo: Arc<S>,
    domain_repo: Arc<D>,
}

impl<T: TenantRepository, S: SiteRepository, D: DomainRepository> DomainResolver<T, S, D> {
    pub fn new(tenant_repo: Arc<T>, site_repo: Arc<S>, domain_repo: Arc<D>) -> Self {
        Self {
            tenant_repo,
            site_repo,
            domain_repo,
        }
    }

    /// Resolve a raw hostname through the domain directory.
    ///
    /// `Ok(None)` is the ordinary "unknown domain" outcome; errors only come
    /// from the storage layer.
    pub async fn resolve(&self, raw_hostname: &str) -> Result<Option<Resolution>> {
        let start = Instant::now();
        let resolution = match normalize_hostname(raw_hostname) {
            Some(hostname) => self.resolve_normalized(&hostname).await?,
            None => None,
        };
        record_outcome(resolution.as_ref(), start);
        Ok(resolution)
    }

    /// Resolve a request hostname, applying the localhost overrides first
    /// when the configuration enables them. A localhost name never falls
    /// through to the domain directory.
    pub async fn resolve_request(
        &self,
        raw_hostname: &str,
        config: &ResolutionConfig,
    ) -> Result<Option<Resolution>> {
        if config.local_overrides_enabled() {
            if let Some(hostname) = normalize_hostname(raw_hostname) {
                if local_tenant_slug(&hostname, &config.root_tenant_slug).is_some() {
                    let start = Instant::now();
                    let resolution = self
                        .resolve_local(&hostname, &config.root_tenant_slug)
                        .await?;
                    record_outcome(resolution.as_ref(), start);
                    return Ok(resolution);
                }
            }
        }

        self.resolve(raw_hostname).await
    }

    /// Development-only overrides: bare `localhost` maps to the root tenant,
    /// `<slug>.localhost` to the tenant with that slug.
    pub async fn resolve_local(
        &self,
        hostname: &str,
        root_tenant_slug: &str,
    ) -> Result<Option<Resolution>> {
        match local_tenant_slug(hostname, root_tenant_slug) {
            Some(slug) => self.resolve_tenant_slug(slug).await,
            None => Ok(None),
        }
    }

    /// Resolve a tenant by slug straight to its site, bypassing the domain
    /// directory.
    pub async fn resolve_tenant_slug(&self, slug: &str) -> Result<Option<Resolution>> {
        let tenant = match self.tenant_repo.find_by_slug(slug).await? {
            Some(tenant) if !tenant.status.is_disabled() => tenant,
            _ => return Ok(None),
        };
        self.tenant_site(tenant, ResolutionStrategy::LocalDevelopment)
            .await
    }

    async fn resolve_normalized(&self, hostname: &str) -> Result<Option<Resolution>> {
        debug!(hostname, "Resolving hostname");

        match self.lookup(hostname, ResolutionStrategy::Exact).await? {
            Lookup::Hit(resolution) => return Ok(Some(resolution)),
            Lookup::Blocked(_) => return Ok(None),
            Lookup::Miss => {}
        }

        let (candidate, strategy) = match strip_www(hostname) {
            Some(apex) => (apex.to_string(), ResolutionStrategy::ApexFallback),
            None => (with_www(hostname), ResolutionStrategy::WwwFallback),
        };
        match self.lookup(&candidate, strategy).await? {
            Lookup::Hit(resolution) => return Ok(Some(resolution)),
            Lookup::Blocked(_) => return Ok(None),
            Lookup::Miss => {}
        }

        // One level only; deeper names are never walked.
        if let Some(parent) = parent_domain(hostname) {
            match self
                .lookup(parent, ResolutionStrategy::SubdomainPattern)
                .await?
            {
                Lookup::Hit(resolution) if resolution.site.settings.subdomain_pattern_enabled => {
                    return Ok(Some(resolution));
                }
                Lookup::Blocked(site) if site.settings.subdomain_pattern_enabled => {
                    return Ok(None);
                }
                Lookup::Hit(_) | Lookup::Blocked(_) => {
                    debug!(hostname, parent, "Parent domain found but subdomain pattern disabled");
                }
                Lookup::Miss => {}
            }
        }

        self.lookup_legacy_tenant(hostname).await
    }

    /// Exact directory lookup, honoring site and tenant status.
    async fn lookup(&self, hostname: &str, strategy: ResolutionStrategy) -> Result<Lookup> {
        let domain = match self.domain_repo.find_by_hostname(hostname).await? {
            Some(domain) => domain,
            None => return Ok(Lookup::Miss),
        };

        let site = match self.site_repo.find_by_id(domain.site_id).await? {
            Some(site) => site,
            None => return Ok(Lookup::Miss),
        };
        if site.status.is_disabled() {
            debug!(hostname, %strategy, "Matched domain belongs to a disabled site");
            return Ok(Lookup::Blocked(site));
        }

        let tenant = match self.tenant_repo.find_by_id(site.tenant_id).await? {
            Some(tenant) if !tenant.status.is_disabled() => tenant,
            _ => {
                debug!(hostname, %strategy, "Matched domain belongs to a missing or disabled tenant");
                return Ok(Lookup::Blocked(site));
            }
        };

        Ok(Lookup::Hit(Resolution {
            tenant,
            site,
            domain: Some(domain),
            strategy,
        }))
    }

    async fn lookup_legacy_tenant(&self, hostname: &str) -> Result<Option<Resolution>> {
        let tenant = match self.tenant_repo.find_by_legacy_hostname(hostname).await? {
            Some(tenant) if !tenant.status.is_disabled() => tenant,
            _ => return Ok(None),
        };
        self.tenant_site(tenant, ResolutionStrategy::LegacyTenant)
            .await
    }

    async fn tenant_site(
        &self,
        tenant: Tenant,
        strategy: ResolutionStrategy,
    ) -> Result<Option<Resolution>> {
        let site = match self.select_site_for_tenant(&tenant).await? {
            Some(site) if !site.status.is_disabled() => site,
            _ => return Ok(None),
        };

        Ok(Some(Resolution {
            tenant,
            site,
            domain: None,
            strategy,
        }))
    }

    /// The tenant's site whose slug equals the tenant slug, otherwise its
    /// earliest-created site.
    pub async fn select_site_for_tenant(&self, tenant: &Tenant) -> Result<Option<Site>> {
        let mut sites = self.site_repo.list_by_tenant(tenant.id).await?;
        if let Some(pos) = sites.iter().position(|site| site.slug == tenant.slug) {
            return Ok(Some(sites.swap_remove(pos)));
        }
        Ok(sites.into_iter().next())
    }
}

fn record_outcome(resolution: Option<&Resolution>, start: Instant) {
    let label = resolution
        .map(|r| r.strategy.as_str())
        .unwrap_or("unresolved");
    counter!("sitegate_domain_resolutions_total", "strategy" => label).increment(1);
    histogram!("sitegate_domain_resolution_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}
