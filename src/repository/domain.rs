//! Domain directory repository

use crate::domain::{CreateDomainInput, Domain, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;
use validator::Validate;

const DOMAIN_COLUMNS: &str = "id, site_id, hostname, `primary`, verified, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Exact lookup of an already-normalized hostname
    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<Domain>>;
    async fn list_by_site(&self, site_id: StringUuid) -> Result<Vec<Domain>>;
    async fn create(&self, input: &CreateDomainInput) -> Result<Domain>;
}

pub struct DomainRepositoryImpl {
    pool: MySqlPool,
}

impl DomainRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DomainRepository for DomainRepositoryImpl {
    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<Domain>> {
        let domain = sqlx::query_as::<_, Domain>(&format!(
            "SELECT {} FROM domains WHERE hostname = ?",
            DOMAIN_COLUMNS
        ))
        .bind(hostname)
        .fetch_optional(&self.pool)
        .await?;

        Ok(domain)
    }

    async fn list_by_site(&self, site_id: StringUuid) -> Result<Vec<Domain>> {
        let domains = sqlx::query_as::<_, Domain>(&format!(
            "SELECT {} FROM domains WHERE site_id = ? ORDER BY `primary` DESC, hostname ASC",
            DOMAIN_COLUMNS
        ))
        .bind(site_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(domains)
    }

    async fn create(&self, input: &CreateDomainInput) -> Result<Domain> {
        let input = input.clone().normalized();
        input.validate()?;

        if self.find_by_hostname(&input.hostname).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Domain '{}' is already connected",
                input.hostname
            )));
        }

        let id = StringUuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO domains (id, site_id, hostname, `primary`, verified, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(input.site_id)
        .bind(&input.hostname)
        .bind(input.primary)
        .bind(input.verified)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_as_conflict(e, &input.hostname))?;

        self.find_by_hostname(&input.hostname)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create domain")))
    }
}

/// A concurrent insert of the same hostname loses on `uk_domains_hostname`.
fn duplicate_as_conflict(err: sqlx::Error, hostname: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("Domain '{}' is already connected", hostname))
        }
        _ => AppError::Database(err),
    }
}
