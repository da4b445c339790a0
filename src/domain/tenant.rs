//! Tenant domain model

use super::common::{ResourceStatus, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Billing/administrative account owning one or more sites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: StringUuid,
    pub slug: String,
    pub name: String,
    /// Historical hostname, still consulted when no domain row matches
    pub legacy_hostname: Option<String>,
    pub status: ResourceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Tenant {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            slug: String::new(),
            name: String::new(),
            legacy_hostname: None,
            status: ResourceStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

lazy_static::lazy_static! {
    pub static ref SLUG_REGEX: regex::Regex = regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Validate slug format (lowercase alphanumeric with hyphens)
pub(crate) fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_slug"))
    }
}
