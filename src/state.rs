//! Application state trait for dependency injection
//!
//! Handlers and middleware are generic over [`HasServices`] so the same code
//! runs against the MySQL-backed `AppState` and the in-memory test state.

use crate::config::Config;
use crate::repository::{
    CategoryRepository, ContentRepository, DomainRepository, SiteRepository, TenantRepository,
};
use crate::service::{CategoryService, ContentService, DomainResolver};

pub trait HasServices: Clone + Send + Sync + 'static {
    type TenantRepo: TenantRepository;
    type SiteRepo: SiteRepository;
    type DomainRepo: DomainRepository;
    type ContentRepo: ContentRepository;
    type CategoryRepo: CategoryRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the Host-to-site resolver
    fn resolver(&self) -> &DomainResolver<Self::TenantRepo, Self::SiteRepo, Self::DomainRepo>;

    /// Get the site-scoped content service
    fn content_service(&self) -> &ContentService<Self::ContentRepo, Self::CategoryRepo>;

    /// Get the site-scoped category service
    fn category_service(&self) -> &CategoryService<Self::CategoryRepo>;

    /// Check whether the database is reachable
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
