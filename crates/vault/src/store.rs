//! Credential persistence trait keyed by (tenant, platform), with an
//! in-memory DashMap implementation for development and testing.
//!
//! The store is a dumb keyed row holder; all lifecycle semantics (schema
//! checks, validation-state resets) live in the vault. Secret encryption is
//! the backing store's concern, not modelled here.

use adbridge_core::credentials::{AdPlatform, CredentialRecord, ValidationOutcome};
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

pub trait CredentialStore: Send + Sync {
    /// Insert or replace the record for its (tenant_id, platform) key.
    fn upsert(&self, record: CredentialRecord) -> anyhow::Result<()>;
    fn get(&self, tenant_id: Uuid, platform: AdPlatform) -> anyhow::Result<Option<CredentialRecord>>;
    /// All records for one tenant. Fresh read, at most one per platform.
    fn list(&self, tenant_id: Uuid) -> anyhow::Result<Vec<CredentialRecord>>;
    /// Atomically set the validation fields on an existing record, leaving
    /// payload and `is_active` untouched. A save committing concurrently
    /// must never be overwritten by this call. Returns `false` when no
    /// record exists for the key.
    fn update_validation(
        &self,
        tenant_id: Uuid,
        platform: AdPlatform,
        outcome: &ValidationOutcome,
    ) -> anyhow::Result<bool>;
}

/// In-memory credential store.
pub struct InMemoryCredentialStore {
    records: DashMap<(Uuid, AdPlatform), CredentialRecord>,
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        info!("Credential store initialized (in-memory, development mode)");
        Self {
            records: DashMap::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn upsert(&self, record: CredentialRecord) -> anyhow::Result<()> {
        self.records
            .insert((record.tenant_id, record.platform), record);
        Ok(())
    }

    fn get(
        &self,
        tenant_id: Uuid,
        platform: AdPlatform,
    ) -> anyhow::Result<Option<CredentialRecord>> {
        Ok(self
            .records
            .get(&(tenant_id, platform))
            .map(|e| e.value().clone()))
    }

    fn list(&self, tenant_id: Uuid) -> anyhow::Result<Vec<CredentialRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|e| e.key().0 == tenant_id)
            .map(|e| e.value().clone())
            .collect())
    }

    fn update_validation(
        &self,
        tenant_id: Uuid,
        platform: AdPlatform,
        outcome: &ValidationOutcome,
    ) -> anyhow::Result<bool> {
        // Mutate in place under the map's per-key lock: concurrent upserts
        // either happen fully before or fully after this write.
        match self.records.get_mut(&(tenant_id, platform)) {
            Some(mut entry) => {
                entry.last_validated_at = Some(outcome.validated_at);
                entry.validation_error = outcome.error.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
