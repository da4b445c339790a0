//! Category repository (site-owned)

use crate::context::{ScopedQuery, SiteScope};
use crate::domain::{Category, CreateCategoryInput, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

const CATEGORY_COLUMNS: &str = "id, site_id, name, slug, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self, scope: &SiteScope) -> Result<Vec<Category>>;
    async fn find_by_id(&self, scope: &SiteScope, id: StringUuid) -> Result<Option<Category>>;
    async fn find_by_slug(&self, scope: &SiteScope, slug: &str) -> Result<Option<Category>>;
    async fn create(&self, scope: &SiteScope, input: &CreateCategoryInput) -> Result<Category>;
}

pub struct CategoryRepositoryImpl {
    pool: MySqlPool,
}

impl CategoryRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for CategoryRepositoryImpl {
    async fn list(&self, scope: &SiteScope) -> Result<Vec<Category>> {
        let mut query = ScopedQuery::select(scope, CATEGORY_COLUMNS, "categories", &["site_id"]);
        query.order_by("name ASC");

        let categories = query
            .builder()
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    async fn find_by_id(&self, scope: &SiteScope, id: StringUuid) -> Result<Option<Category>> {
        let mut query = ScopedQuery::select(scope, CATEGORY_COLUMNS, "categories", &["site_id"]);
        query.and_eq("id", id);

        let category = query
            .builder()
            .build_query_as::<Category>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    async fn find_by_slug(&self, scope: &SiteScope, slug: &str) -> Result<Option<Category>> {
        let mut query = ScopedQuery::select(scope, CATEGORY_COLUMNS, "categories", &["site_id"]);
        query.and_eq("slug", slug.to_string());

        let category = query
            .builder()
            .build_query_as::<Category>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    async fn create(&self, scope: &SiteScope, input: &CreateCategoryInput) -> Result<Category> {
        let site_id = scope.require_site()?;
        let id = StringUuid::new_v4();

        sqlx::query(
            "INSERT INTO categories (id, site_id, name, slug, created_at) VALUES (?, ?, ?, ?, NOW())",
        )
        .bind(id)
        .bind(site_id)
        .bind(&input.name)
        .bind(&input.slug)
        .execute(&self.pool)
        .await?;

        self.find_by_id(scope, id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create category")))
    }
}
