//! Data access layer (Repository pattern)
//!
//! `tenant`, `site` and `domain` form the domain directory and are read-only
//! during request handling. `content` and `category` are site-owned and only
//! reachable through a [`crate::context::SiteScope`].

pub mod category;
pub mod content;
pub mod domain;
pub mod site;
pub mod tenant;

pub use category::CategoryRepository;
pub use content::ContentRepository;
pub use domain::DomainRepository;
pub use site::SiteRepository;
pub use tenant::TenantRepository;
