//! Domain (hostname binding) model

use super::common::StringUuid;
use crate::hostname::normalize_hostname;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A hostname bound to exactly one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Domain {
    pub id: StringUuid,
    pub site_id: StringUuid,
    /// Normalized, globally unique
    pub hostname: String,
    /// Marks the canonical hostname of the site
    pub primary: bool,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Domain {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            site_id: StringUuid::nil(),
            hostname: String::new(),
            primary: false,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for binding a hostname to a site
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDomainInput {
    pub site_id: StringUuid,
    #[validate(length(min = 1, max = 253))]
    pub hostname: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub verified: bool,
}

impl CreateDomainInput {
    /// Build an input whose hostname is already normalized. Blank hostnames
    /// are kept empty so validation rejects them.
    pub fn new(site_id: StringUuid, hostname: &str) -> Self {
        Self {
            site_id,
            hostname: normalize_hostname(hostname).unwrap_or_default(),
            primary: false,
            verified: false,
        }
    }

    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    pub fn verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    /// Normalize the hostname in place (for inputs that came from serde).
    pub fn normalized(mut self) -> Self {
        self.hostname = normalize_hostname(&self.hostname).unwrap_or_default();
        self
    }
}
