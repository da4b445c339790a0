//! Tenant repository

use crate::domain::{StringUuid, Tenant};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

const TENANT_COLUMNS: &str =
    "id, slug, name, legacy_hostname, status, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Tenant>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>>;
    /// Exact match against the historical hostname column
    async fn find_by_legacy_hostname(&self, hostname: &str) -> Result<Option<Tenant>>;
}

pub struct TenantRepositoryImpl {
    pool: MySqlPool,
}

impl TenantRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for TenantRepositoryImpl {
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {} FROM tenants WHERE id = ?",
            TENANT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {} FROM tenants WHERE slug = ?",
            TENANT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }

    async fn find_by_legacy_hostname(&self, hostname: &str) -> Result<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {} FROM tenants WHERE legacy_hostname = ? ORDER BY created_at ASC, id ASC LIMIT 1",
            TENANT_COLUMNS
        ))
        .bind(hostname)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }
}
