//! Site-scope filter
//!
//! Every read or write of a site-owned table goes through a [`SiteScope`].
//! The site-bound scope can only be obtained from the current
//! [`RequestContext`]; the cross-site scope has its own constructor,
//! [`SiteScope::unscoped`], so bypasses stand out in review.

use super::RequestContext;
use crate::domain::StringUuid;
use crate::error::{AppError, Result};
use sqlx::{MySql, QueryBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SiteBinding {
    site_id: StringUuid,
    tenant_id: StringUuid,
}

/// Which rows of site-owned tables a query may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteScope {
    binding: Option<SiteBinding>,
}

impl SiteScope {
    /// Scope bound to the request's current site.
    ///
    /// Fails closed with [`AppError::SiteContextMissing`] when no request
    /// context is established.
    pub fn current() -> Result<Self> {
        RequestContext::with_current(|ctx| SiteScope {
            binding: Some(SiteBinding {
                site_id: ctx.site.id,
                tenant_id: ctx.tenant.id,
            }),
        })
        .ok_or(AppError::SiteContextMissing)
    }

    /// Cross-site scope for administrative and background work.
    pub fn unscoped() -> Self {
        SiteScope { binding: None }
    }

    pub fn is_unscoped(&self) -> bool {
        self.binding.is_none()
    }

    pub fn site_id(&self) -> Option<StringUuid> {
        self.binding.map(|b| b.site_id)
    }

    pub fn tenant_id(&self) -> Option<StringUuid> {
        self.binding.map(|b| b.tenant_id)
    }

    /// The site new rows are written to. Writes always need a site.
    pub fn require_site(&self) -> Result<StringUuid> {
        self.site_id().ok_or_else(|| {
            AppError::BadRequest("Site-owned records can only be created within a site".to_string())
        })
    }

    /// Whether a row owned by `site_id` is visible through this scope.
    pub fn permits(&self, site_id: StringUuid) -> bool {
        match self.binding {
            Some(binding) => binding.site_id == site_id,
            None => true,
        }
    }

    /// Append ` AND <column> = ?` when bound to a site.
    pub fn push_predicate(&self, builder: &mut QueryBuilder<'_, MySql>, column: &str) {
        if let Some(binding) = self.binding {
            builder
                .push(" AND ")
                .push(column)
                .push(" = ")
                .push_bind(binding.site_id);
        }
    }
}

/// SQL builder that applies the site predicate before anything else.
///
/// `site_columns` must name the `site_id` column of every site-owned table
/// in the FROM clause, joins included.
pub struct ScopedQuery<'args> {
    builder: QueryBuilder<'args, MySql>,
}

impl<'args> ScopedQuery<'args> {
    pub fn select(scope: &SiteScope, columns: &str, from: &str, site_columns: &[&str]) -> Self {
        let mut builder = QueryBuilder::new("SELECT ");
        builder.push(columns).push(" FROM ").push(from).push(" WHERE 1 = 1");
        for column in site_columns {
            scope.push_predicate(&mut builder, column);
        }
        Self { builder }
    }

    pub fn delete(scope: &SiteScope, table: &str) -> Self {
        let mut builder = QueryBuilder::new("DELETE FROM ");
        builder.push(table).push(" WHERE 1 = 1");
        scope.push_predicate(&mut builder, "site_id");
        Self { builder }
    }

    pub fn and_eq<T>(&mut self, column: &str, value: T) -> &mut Self
    where
        T: 'args + sqlx::Encode<'args, MySql> + sqlx::Type<MySql>,
    {
        self.builder
            .push(" AND ")
            .push(column)
            .push(" = ")
            .push_bind(value);
        self
    }

    pub fn order_by(&mut self, clause: &str) -> &mut Self {
        self.builder.push(" ORDER BY ").push(clause);
        self
    }

    pub fn group_by(&mut self, clause: &str) -> &mut Self {
        self.builder.push(" GROUP BY ").push(clause);
        self
    }

    pub fn paginate(&mut self, offset: i64, limit: i64) -> &mut Self {
        self.builder
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        self
    }

    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    pub fn builder(&mut self) -> &mut QueryBuilder<'args, MySql> {
        &mut self.builder
    }
}
