//! Tenant and membership persistence traits, with in-memory DashMap
//! implementations for development and testing.
//!
//! Production: back these with PostgreSQL or similar; uniqueness of the
//! membership id (== identity id) is the store's constraint to keep.

use adbridge_core::tenancy::{Membership, Tenant};
use anyhow::bail;
use chrono::Utc;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

/// Fields supplied when inserting a tenant row.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub business_number: String,
}

pub trait TenantStore: Send + Sync {
    fn insert(&self, new: NewTenant) -> anyhow::Result<Tenant>;
    fn delete(&self, id: Uuid) -> anyhow::Result<()>;
    fn get(&self, id: Uuid) -> anyhow::Result<Option<Tenant>>;
}

pub trait MembershipStore: Send + Sync {
    fn insert(&self, membership: Membership) -> anyhow::Result<Membership>;
    fn delete(&self, id: Uuid) -> anyhow::Result<()>;
    fn get(&self, id: Uuid) -> anyhow::Result<Option<Membership>>;
}

/// In-memory tenant store.
pub struct InMemoryTenantStore {
    tenants: DashMap<Uuid, Tenant>,
}

impl Default for InMemoryTenantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTenantStore {
    pub fn new() -> Self {
        info!("Tenant store initialized (in-memory, development mode)");
        Self {
            tenants: DashMap::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.tenants.len()
    }
}

impl TenantStore for InMemoryTenantStore {
    fn insert(&self, new: NewTenant) -> anyhow::Result<Tenant> {
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: new.name,
            business_number: new.business_number,
            created_at: Utc::now(),
        };
        info!(tenant_id = %tenant.id, tenant_name = %tenant.name, "Tenant created");
        self.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        if self.tenants.remove(&id).is_none() {
            bail!("tenant {} not found", id);
        }
        info!(tenant_id = %id, "Tenant deleted");
        Ok(())
    }

    fn get(&self, id: Uuid) -> anyhow::Result<Option<Tenant>> {
        Ok(self.tenants.get(&id).map(|e| e.value().clone()))
    }
}

/// In-memory membership store. One membership per identity: the row id is
/// the identity id.
pub struct InMemoryMembershipStore {
    memberships: DashMap<Uuid, Membership>,
}

impl Default for InMemoryMembershipStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        info!("Membership store initialized (in-memory, development mode)");
        Self {
            memberships: DashMap::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.memberships.len()
    }
}

impl MembershipStore for InMemoryMembershipStore {
    fn insert(&self, membership: Membership) -> anyhow::Result<Membership> {
        if self.memberships.contains_key(&membership.id) {
            bail!("membership {} already exists", membership.id);
        }
        info!(
            membership_id = %membership.id,
            tenant_id = %membership.tenant_id,
            role = ?membership.role,
            "Membership created"
        );
        self.memberships.insert(membership.id, membership.clone());
        Ok(membership)
    }

    fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        if self.memberships.remove(&id).is_none() {
            bail!("membership {} not found", id);
        }
        info!(membership_id = %id, "Membership deleted");
        Ok(())
    }

    fn get(&self, id: Uuid) -> anyhow::Result<Option<Membership>> {
        Ok(self.memberships.get(&id).map(|e| e.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adbridge_core::tenancy::MemberRole;

    #[test]
    fn test_tenant_insert_get_delete() {
        let store = InMemoryTenantStore::new();
        let tenant = store
            .insert(NewTenant {
                name: "Seoul Clinic".to_string(),
                business_number: "123-45-67890".to_string(),
            })
            .unwrap();

        let fetched = store.get(tenant.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Seoul Clinic");

        store.delete(tenant.id).unwrap();
        assert!(store.get(tenant.id).unwrap().is_none());
        assert!(store.delete(tenant.id).is_err());
    }

    #[test]
    fn test_membership_id_is_unique() {
        let store = InMemoryMembershipStore::new();
        let membership = Membership {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            full_name: "Kim".to_string(),
            role: MemberRole::Owner,
        };
        store.insert(membership.clone()).unwrap();
        assert!(store.insert(membership).is_err());
        assert_eq!(store.count(), 1);
    }
}
