//! API key model for authentication.
//!
//! API keys identify club staff making requests to the API. They are stored
//! in the database as SHA-256 hashes, together with the role that drives
//! authorization (keys are issued out of band by the operator).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Capability role carried by an API key.
///
/// - `Admin`: seeds the chart, records journal entries, decides payouts,
///   reads reports
/// - `Coach`: creates payout requests and lists their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Coach,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Coach => "coach",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "coach" => Some(Self::Coach),
            _ => None,
        }
    }
}

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table. Inactive keys are rejected during
/// authentication, which revokes access without deleting the record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    /// Unique identifier for this API key
    pub id: Uuid,

    /// SHA-256 hash of the actual API key (64 hex characters)
    pub key_hash: String,

    /// Display name of the staff member holding this key
    pub actor_name: String,

    /// "admin" or "coach"
    pub role: String,

    /// Whether this API key is currently active
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrips_through_strings() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("coach"), Some(Role::Coach));
        assert_eq!(Role::parse("member"), None);
        assert_eq!(Role::Admin.as_str(), "admin");
    }
}
