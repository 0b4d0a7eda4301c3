//! Boundary over the external identity provider: create and delete
//! authentication principals. Nothing else about identities is managed here.

use adbridge_core::tenancy::Identity;
use anyhow::bail;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

/// Request to create a new authentication principal.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Create the identity pre-confirmed (development signup policy).
    pub confirmed: bool,
}

/// Thin gateway to the identity provider. Implementations own transport
/// concerns, including request deadlines; a timed-out call surfaces here as
/// an error with no confirmed side effect.
pub trait IdentityGateway: Send + Sync {
    fn create_identity(&self, new: &NewIdentity) -> anyhow::Result<Identity>;
    fn delete_identity(&self, id: Uuid) -> anyhow::Result<()>;
}

/// In-memory identity provider for development and tests. Enforces email
/// uniqueness the way a hosted provider does.
pub struct InMemoryIdentityGateway {
    identities: DashMap<Uuid, Identity>,
    by_email: DashMap<String, Uuid>,
}

impl Default for InMemoryIdentityGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityGateway {
    pub fn new() -> Self {
        info!("Identity gateway initialized (in-memory, development mode)");
        Self {
            identities: DashMap::new(),
            by_email: DashMap::new(),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Identity> {
        self.identities.get(&id).map(|e| e.value().clone())
    }

    pub fn count(&self) -> usize {
        self.identities.len()
    }
}

impl IdentityGateway for InMemoryIdentityGateway {
    fn create_identity(&self, new: &NewIdentity) -> anyhow::Result<Identity> {
        let email = new.email.to_lowercase();
        if self.by_email.contains_key(&email) {
            bail!("an identity with email {} already exists", email);
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            email: email.clone(),
            confirmed: new.confirmed,
            full_name: new.full_name.clone(),
        };
        self.by_email.insert(email, identity.id);
        self.identities.insert(identity.id, identity.clone());
        info!(identity_id = %identity.id, "Identity created");
        Ok(identity)
    }

    fn delete_identity(&self, id: Uuid) -> anyhow::Result<()> {
        match self.identities.remove(&id) {
            Some((_, identity)) => {
                self.by_email.remove(&identity.email);
                info!(identity_id = %id, "Identity deleted");
                Ok(())
            }
            None => bail!("identity {} not found", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_identity() -> NewIdentity {
        NewIdentity {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            full_name: "Kim".to_string(),
            confirmed: true,
        }
    }

    #[test]
    fn test_create_and_delete_identity() {
        let gateway = InMemoryIdentityGateway::new();
        let identity = gateway.create_identity(&sample_identity()).unwrap();
        assert_eq!(identity.email, "a@x.com");
        assert!(identity.confirmed);
        assert_eq!(gateway.count(), 1);

        gateway.delete_identity(identity.id).unwrap();
        assert_eq!(gateway.count(), 0);
        assert!(gateway.delete_identity(identity.id).is_err());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let gateway = InMemoryIdentityGateway::new();
        gateway.create_identity(&sample_identity()).unwrap();

        let err = gateway.create_identity(&sample_identity()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(gateway.count(), 1);
    }
}
