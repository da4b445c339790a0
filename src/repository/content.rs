//! Content repository (site-owned)
//!
//! Every method takes a [`SiteScope`]; the site predicate is added by
//! [`ScopedQuery`] or [`SiteScope::push_predicate`], never by the caller.

use crate::context::{ScopedQuery, SiteScope};
use crate::domain::{ContentItem, CreateContentInput, SiteContentCount, StringUuid, UpdateContentInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

const CONTENT_COLUMNS: &str =
    "c.id, c.site_id, c.category_id, c.title, c.url, c.body, c.created_at, c.updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn list(&self, scope: &SiteScope, offset: i64, limit: i64) -> Result<Vec<ContentItem>>;
    async fn count(&self, scope: &SiteScope) -> Result<i64>;
    async fn find_by_id(&self, scope: &SiteScope, id: StringUuid) -> Result<Option<ContentItem>>;
    async fn list_by_category(
        &self,
        scope: &SiteScope,
        category_id: StringUuid,
    ) -> Result<Vec<ContentItem>>;
    async fn create(&self, scope: &SiteScope, input: &CreateContentInput) -> Result<ContentItem>;
    async fn update(
        &self,
        scope: &SiteScope,
        id: StringUuid,
        input: &UpdateContentInput,
    ) -> Result<ContentItem>;
    async fn delete(&self, scope: &SiteScope, id: StringUuid) -> Result<()>;
    /// Per-site counts for every site of a tenant
    async fn count_by_site_for_tenant(
        &self,
        scope: &SiteScope,
        tenant_id: StringUuid,
    ) -> Result<Vec<SiteContentCount>>;
}

pub struct ContentRepositoryImpl {
    pool: MySqlPool,
}

impl ContentRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for ContentRepositoryImpl {
    async fn list(&self, scope: &SiteScope, offset: i64, limit: i64) -> Result<Vec<ContentItem>> {
        let mut query = ScopedQuery::select(scope, CONTENT_COLUMNS, "contents c", &["c.site_id"]);
        query
            .order_by("c.created_at DESC, c.id ASC")
            .paginate(offset, limit);

        let items = query
            .builder()
            .build_query_as::<ContentItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn count(&self, scope: &SiteScope) -> Result<i64> {
        let mut query = ScopedQuery::select(scope, "COUNT(*)", "contents c", &["c.site_id"]);
        let row: (i64,) = query
            .builder()
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn find_by_id(&self, scope: &SiteScope, id: StringUuid) -> Result<Option<ContentItem>> {
        let mut query = ScopedQuery::select(scope, CONTENT_COLUMNS, "contents c", &["c.site_id"]);
        query.and_eq("c.id", id);

        let item = query
            .builder()
            .build_query_as::<ContentItem>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn list_by_category(
        &self,
        scope: &SiteScope,
        category_id: StringUuid,
    ) -> Result<Vec<ContentItem>> {
        let mut query = ScopedQuery::select(
            scope,
            CONTENT_COLUMNS,
            "contents c INNER JOIN categories k ON k.id = c.category_id",
            &["c.site_id", "k.site_id"],
        );
        query
            .and_eq("k.id", category_id)
            .order_by("c.created_at DESC, c.id ASC");

        let items = query
            .builder()
            .build_query_as::<ContentItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn create(&self, scope: &SiteScope, input: &CreateContentInput) -> Result<ContentItem> {
        let site_id = scope.require_site()?;
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO contents (id, site_id, category_id, title, url, body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(site_id)
        .bind(input.category_id)
        .bind(&input.title)
        .bind(&input.url)
        .bind(&input.body)
        .execute(&self.pool)
        .await?;

        self.find_by_id(scope, id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create content")))
    }

    async fn update(
        &self,
        scope: &SiteScope,
        id: StringUuid,
        input: &UpdateContentInput,
    ) -> Result<ContentItem> {
        // Out-of-scope rows are indistinguishable from missing ones
        if self.find_by_id(scope, id).await?.is_none() {
            return Err(AppError::NotFound(format!("Content {} not found", id)));
        }

        let mut builder = QueryBuilder::<MySql>::new("UPDATE contents SET updated_at = NOW()");
        if let Some(title) = &input.title {
            builder.push(", title = ").push_bind(title.clone());
        }
        if let Some(url) = &input.url {
            builder.push(", url = ").push_bind(url.clone());
        }
        if let Some(body) = &input.body {
            builder.push(", body = ").push_bind(body.clone());
        }
        builder.push(" WHERE id = ").push_bind(id);
        scope.push_predicate(&mut builder, "site_id");

        builder.build().execute(&self.pool).await?;

        self.find_by_id(scope, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content {} not found", id)))
    }

    async fn delete(&self, scope: &SiteScope, id: StringUuid) -> Result<()> {
        let mut query = ScopedQuery::delete(scope, "contents");
        query.and_eq("id", id);

        let result = query.builder().build().execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Content {} not found", id)));
        }

        Ok(())
    }

    async fn count_by_site_for_tenant(
        &self,
        scope: &SiteScope,
        tenant_id: StringUuid,
    ) -> Result<Vec<SiteContentCount>> {
        let mut query = ScopedQuery::select(
            scope,
            "c.site_id AS site_id, COUNT(*) AS count",
            "contents c INNER JOIN sites s ON s.id = c.site_id",
            &["c.site_id"],
        );
        query
            .and_eq("s.tenant_id", tenant_id)
            .group_by("c.site_id")
            .order_by("c.site_id ASC");

        let counts = query
            .builder()
            .build_query_as::<SiteContentCount>()
            .fetch_all(&self.pool)
            .await?;

        Ok(counts)
    }
}
