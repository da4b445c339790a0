//! Site domain model

use super::common::{ResourceStatus, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-site feature flags, stored as JSON.
///
/// Unknown keys are ignored and missing keys take their defaults, so older
/// rows keep deserializing as flags are added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Resolve `<anything>.<registered apex>` to this site (one level only).
    /// Defaults to `false`.
    pub subdomain_pattern_enabled: bool,
}

/// A content property under a tenant; the unit of data isolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Site {
    pub id: StringUuid,
    pub tenant_id: StringUuid,
    /// Unique within the tenant
    pub slug: String,
    pub name: String,
    pub status: ResourceStatus,
    #[sqlx(json)]
    pub settings: SiteSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Site {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            tenant_id: StringUuid::nil(),
            slug: String::new(),
            name: String::new(),
            status: ResourceStatus::default(),
            settings: SiteSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
