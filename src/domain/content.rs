//! Site-owned content models

use super::common::StringUuid;
use super::tenant::validate_slug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A content record owned by exactly one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ContentItem {
    pub id: StringUuid,
    pub site_id: StringUuid,
    pub category_id: Option<StringUuid>,
    pub title: String,
    pub url: Option<String>,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for ContentItem {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            site_id: StringUuid::nil(),
            category_id: None,
            title: String::new(),
            url: None,
            body: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating content in the current site
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateContentInput {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[validate(url)]
    pub url: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<StringUuid>,
}

/// Input for updating content in the current site
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContentInput {
    #[validate(length(min = 1, max = 500))]
    pub title: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    pub body: Option<String>,
}

/// A content category owned by exactly one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: StringUuid,
    pub site_id: StringUuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Default for Category {
    fn default() -> Self {
        Self {
            id: StringUuid::new_v4(),
            site_id: StringUuid::nil(),
            name: String::new(),
            slug: String::new(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 63), custom(function = "validate_slug"))]
    pub slug: String,
}

/// Per-site row count, produced by tenant-wide (unscoped) queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SiteContentCount {
    pub site_id: StringUuid,
    pub count: i64,
}
