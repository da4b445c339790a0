//! Site-scoped content business logic
//!
//! Every method obtains its [`SiteScope`] from the current request context,
//! so handlers never pass a site id around. Cross-site work has to go through
//! [`ContentService::unscoped`].

use crate::context::SiteScope;
use crate::domain::{
    Category, ContentItem, CreateCategoryInput, CreateContentInput, SiteContentCount, StringUuid,
    UpdateContentInput,
};
use crate::error::{AppError, Result};
use crate::repository::{CategoryRepository, ContentRepository};
use std::sync::Arc;
use tracing::warn;
use validator::Validate;

pub struct ContentService<C: ContentRepository, K: CategoryRepository> {
    content_repo: Arc<C>,
    category_repo: Arc<K>,
}

impl<C: ContentRepository, K: CategoryRepository> ContentService<C, K> {
    pub fn new(content_repo: Arc<C>, category_repo: Arc<K>) -> Self {
        Self {
            content_repo,
            category_repo,
        }
    }

    /// One page of the current site's content plus the site's total.
    pub async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<ContentItem>, i64)> {
        let scope = SiteScope::current()?;
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        let items = self.content_repo.list(&scope, offset, per_page).await?;
        let total = self.content_repo.count(&scope).await?;
        Ok((items, total))
    }

    pub async fn get(&self, id: StringUuid) -> Result<ContentItem> {
        let scope = SiteScope::current()?;
        self.content_repo
            .find_by_id(&scope, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content {} not found", id)))
    }

    pub async fn create(&self, input: CreateContentInput) -> Result<ContentItem> {
        input.validate()?;
        let scope = SiteScope::current()?;

        if let Some(category_id) = input.category_id {
            if self
                .category_repo
                .find_by_id(&scope, category_id)
                .await?
                .is_none()
            {
                warn!(%category_id, "Rejected content referencing a category outside the site");
                return Err(AppError::BadRequest(format!(
                    "Category {} does not exist",
                    category_id
                )));
            }
        }

        self.content_repo.create(&scope, &input).await
    }

    pub async fn update(&self, id: StringUuid, input: UpdateContentInput) -> Result<ContentItem> {
        input.validate()?;
        let scope = SiteScope::current()?;
        self.content_repo.update(&scope, id, &input).await
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        let scope = SiteScope::current()?;
        self.content_repo.delete(&scope, id).await
    }

    pub async fn list_by_category(&self, category_id: StringUuid) -> Result<Vec<ContentItem>> {
        let scope = SiteScope::current()?;
        if self
            .category_repo
            .find_by_id(&scope, category_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }
        self.content_repo.list_by_category(&scope, category_id).await
    }

    /// Cross-site accessors. Usable with or without a request context.
    pub fn unscoped(&self) -> UnscopedContent<'_, C> {
        UnscopedContent {
            content_repo: &self.content_repo,
        }
    }
}

/// Content queries that deliberately ignore the current site
pub struct UnscopedContent<'a, C: ContentRepository> {
    content_repo: &'a Arc<C>,
}

impl<C: ContentRepository> UnscopedContent<'_, C> {
    pub async fn list_all(&self, offset: i64, limit: i64) -> Result<Vec<ContentItem>> {
        self.content_repo
            .list(&SiteScope::unscoped(), offset, limit)
            .await
    }

    /// Content counts for every site of a tenant
    pub async fn totals_for_tenant(&self, tenant_id: StringUuid) -> Result<Vec<SiteContentCount>> {
        self.content_repo
            .count_by_site_for_tenant(&SiteScope::unscoped(), tenant_id)
            .await
    }
}

pub struct CategoryService<K: CategoryRepository> {
    category_repo: Arc<K>,
}

impl<K: CategoryRepository> CategoryService<K> {
    pub fn new(category_repo: Arc<K>) -> Self {
        Self { category_repo }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let scope = SiteScope::current()?;
        self.category_repo.list(&scope).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<Category> {
        let scope = SiteScope::current()?;
        self.category_repo
            .find_by_id(&scope, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Slugs are unique per site, not globally.
    pub async fn create(&self, input: CreateCategoryInput) -> Result<Category> {
        input.validate()?;
        let scope = SiteScope::current()?;

        if self
            .category_repo
            .find_by_slug(&scope, &input.slug)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Category with slug '{}' already exists",
                input.slug
            )));
        }

        self.category_repo.create(&scope, &input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::context_for;
    use crate::repository::category::MockCategoryRepository;
    use crate::repository::content::MockContentRepository;
    use mockall::predicate::*;

    fn create_test_service(
        content_repo: MockContentRepository,
        category_repo: MockCategoryRepository,
    ) -> ContentService<MockContentRepository, MockCategoryRepository> {
        ContentService::new(Arc::new(content_repo), Arc::new(category_repo))
    }

    #[tokio::test]
    async fn test_get_without_context_fails_closed() {
        let service =
            create_test_service(MockContentRepository::new(), MockCategoryRepository::new());

        let result = service.get(StringUuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::SiteContextMissing)));
    }

    #[tokio::test]
    async fn test_get_uses_current_site_scope() {
        let ctx = context_for("acme", "a");
        let site_id = ctx.site_id();
        let item = ContentItem {
            site_id,
            title: "Hello".to_string(),
            ..Default::default()
        };
        let item_id = item.id;

        let mut content_repo = MockContentRepository::new();
        content_repo
            .expect_find_by_id()
            .withf(move |scope, id| scope.site_id() == Some(site_id) && *id == item_id)
            .returning(move |_, _| Ok(Some(item.clone())));

        let service = create_test_service(content_repo, MockCategoryRepository::new());
        let found = ctx.scope(service.get(item_id)).await.unwrap();
        assert_eq!(found.title, "Hello");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let ctx = context_for("acme", "a");
        let mut content_repo = MockContentRepository::new();
        content_repo
            .expect_find_by_id()
            .returning(|_, _| Ok(None));

        let service = create_test_service(content_repo, MockCategoryRepository::new());
        let result = ctx.scope(service.get(StringUuid::new_v4())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_pages_through_scope() {
        let ctx = context_for("acme", "a");
        let site_id = ctx.site_id();

        let mut content_repo = MockContentRepository::new();
        content_repo
            .expect_list()
            .withf(move |scope, offset, limit| {
                scope.site_id() == Some(site_id) && *offset == 20 && *limit == 10
            })
            .returning(|_, _, _| Ok(vec![]));
        content_repo.expect_count().returning(|_| Ok(21));

        let service = create_test_service(content_repo, MockCategoryRepository::new());
        let (items, total) = ctx.scope(service.list(3, 10)).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 21);
    }

    #[tokio::test]
    async fn test_list_far_past_last_page_saturates() {
        let ctx = context_for("acme", "a");

        let mut content_repo = MockContentRepository::new();
        content_repo
            .expect_list()
            .withf(|_, offset, limit| *offset == i64::MAX && *limit == 100)
            .returning(|_, _, _| Ok(vec![]));
        content_repo.expect_count().returning(|_| Ok(3));

        let service = create_test_service(content_repo, MockCategoryRepository::new());
        let (items, total) = ctx.scope(service.list(i64::MAX, 100)).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_create_rejects_foreign_category() {
        let ctx = context_for("acme", "a");
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_id()
            .returning(|_, _| Ok(None));
        let mut content_repo = MockContentRepository::new();
        content_repo.expect_create().never();

        let service = create_test_service(content_repo, category_repo);
        let input = CreateContentInput {
            title: "Post".to_string(),
            category_id: Some(StringUuid::new_v4()),
            ..Default::default()
        };

        let result = ctx.scope(service.create(input)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let ctx = context_for("acme", "a");
        let service =
            create_test_service(MockContentRepository::new(), MockCategoryRepository::new());
        let input = CreateContentInput {
            title: String::new(),
            ..Default::default()
        };

        let result = ctx.scope(service.create(input)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_writes_to_current_site() {
        let ctx = context_for("acme", "a");
        let site_id = ctx.site_id();

        let mut content_repo = MockContentRepository::new();
        content_repo
            .expect_create()
            .withf(move |scope, input| {
                scope.site_id() == Some(site_id) && input.title == "Post"
            })
            .returning(move |_, input| {
                Ok(ContentItem {
                    site_id,
                    title: input.title.clone(),
                    ..Default::default()
                })
            });

        let service = create_test_service(content_repo, MockCategoryRepository::new());
        let input = CreateContentInput {
            title: "Post".to_string(),
            ..Default::default()
        };

        let created = ctx.scope(service.create(input)).await.unwrap();
        assert_eq!(created.site_id, site_id);
    }

    #[tokio::test]
    async fn test_list_by_category_requires_visible_category() {
        let ctx = context_for("acme", "a");
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_id()
            .returning(|_, _| Ok(None));
        let mut content_repo = MockContentRepository::new();
        content_repo.expect_list_by_category().never();

        let service = create_test_service(content_repo, category_repo);
        let result = ctx
            .scope(service.list_by_category(StringUuid::new_v4()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unscoped_works_without_context() {
        let tenant_id = StringUuid::new_v4();
        let mut content_repo = MockContentRepository::new();
        content_repo
            .expect_list()
            .withf(|scope, _, _| scope.is_unscoped())
            .returning(|_, _, _| Ok(vec![ContentItem::default(), ContentItem::default()]));
        content_repo
            .expect_count_by_site_for_tenant()
            .withf(move |scope, id| scope.is_unscoped() && *id == tenant_id)
            .returning(|_, _| Ok(vec![]));

        let service = create_test_service(content_repo, MockCategoryRepository::new());
        assert_eq!(service.unscoped().list_all(0, 100).await.unwrap().len(), 2);
        assert!(service
            .unscoped()
            .totals_for_tenant(tenant_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_category_duplicate_slug() {
        let ctx = context_for("acme", "a");
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_slug()
            .with(always(), eq("news"))
            .returning(|_, _| Ok(Some(Category::default())));
        category_repo.expect_create().never();

        let service = CategoryService::new(Arc::new(category_repo));
        let input = CreateCategoryInput {
            name: "News".to_string(),
            slug: "news".to_string(),
        };

        let result = ctx.scope(service.create(input)).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
