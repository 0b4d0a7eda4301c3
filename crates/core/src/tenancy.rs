//! Tenancy rows: authentication identities, tenants, and memberships.
//!
//! These three records are created together by the provisioning saga and,
//! outside that flow, are read-only in this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a membership within a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

/// Authentication principal, owned by the external identity provider.
/// This service only ever creates and deletes these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub confirmed: bool,
    /// Display-name metadata attached at creation time.
    pub full_name: String,
}

/// Organizational unit that owns memberships and credential records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    /// Business registration number. Not unique: placeholder values are
    /// generated when the signup omits one.
    pub business_number: String,
    pub created_at: DateTime<Utc>,
}

/// Association of an identity to a tenant. `id` equals the identity id;
/// the provisioning flow creates one membership per identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: MemberRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_serde() {
        assert_eq!(serde_json::to_string(&MemberRole::Owner).unwrap(), "\"owner\"");
        let role: MemberRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, MemberRole::Admin);
    }
}
