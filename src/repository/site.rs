//! Site repository

use crate::domain::{Site, StringUuid};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

const SITE_COLUMNS: &str = "id, tenant_id, slug, name, status, settings, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteRepository: Send + Sync {
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Site>>;
    /// All sites of a tenant, oldest first (ties broken by id)
    async fn list_by_tenant(&self, tenant_id: StringUuid) -> Result<Vec<Site>>;
}

pub struct SiteRepositoryImpl {
    pool: MySqlPool,
}

impl SiteRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SiteRepository for SiteRepositoryImpl {
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Site>> {
        let site = sqlx::query_as::<_, Site>(&format!(
            "SELECT {} FROM sites WHERE id = ?",
            SITE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(site)
    }

    async fn list_by_tenant(&self, tenant_id: StringUuid) -> Result<Vec<Site>> {
        let sites = sqlx::query_as::<_, Site>(&format!(
            "SELECT {} FROM sites WHERE tenant_id = ? ORDER BY created_at ASC, id ASC",
            SITE_COLUMNS
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sites)
    }
}
