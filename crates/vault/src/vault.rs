//! The credential vault: owns the lifecycle of per-tenant platform secret
//! bundles on top of a [`CredentialStore`].

use crate::store::CredentialStore;
use adbridge_core::credentials::{
    AdPlatform, CredentialPayload, CredentialRecord, ValidationOutcome,
};
use adbridge_core::error::{VaultError, VaultResult};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Manages credential records for all tenants. The vault never calls the
/// advertising platforms itself; validation happens in an external worker
/// that reports back through [`record_validation`].
///
/// [`record_validation`]: CredentialVault::record_validation
pub struct CredentialVault {
    store: Arc<dyn CredentialStore>,
}

impl CredentialVault {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Validate and upsert a platform secret bundle for a tenant.
    ///
    /// Any successful write resets `last_validated_at` and
    /// `validation_error` to null: the credentials changed, so prior
    /// validation state no longer applies. Concurrent saves for the same key
    /// are last-writer-wins.
    pub fn save(
        &self,
        tenant_id: Uuid,
        platform: AdPlatform,
        payload: serde_json::Value,
    ) -> VaultResult<()> {
        let payload = CredentialPayload::parse(platform, payload)?;

        let record = CredentialRecord {
            tenant_id,
            platform,
            payload,
            is_active: true,
            last_validated_at: None,
            validation_error: None,
        };
        self.store
            .upsert(record)
            .map_err(|e| VaultError::Persistence(e.to_string()))?;

        info!(tenant_id = %tenant_id, platform = %platform, "Credentials saved");
        Ok(())
    }

    /// All credential records for one tenant. Fresh read each call; never
    /// includes another tenant's records.
    pub fn list(&self, tenant_id: Uuid) -> VaultResult<Vec<CredentialRecord>> {
        self.store
            .list(tenant_id)
            .map_err(|e| VaultError::Persistence(e.to_string()))
    }

    /// Record a validation-worker outcome against an existing record.
    /// Updates only the validation fields; payload and `is_active` are
    /// untouched. The write is a single keyed store call so a save
    /// committing concurrently can never be clobbered with stale data.
    pub fn record_validation(
        &self,
        tenant_id: Uuid,
        platform: AdPlatform,
        outcome: &ValidationOutcome,
    ) -> VaultResult<()> {
        let found = self
            .store
            .update_validation(tenant_id, platform, outcome)
            .map_err(|e| VaultError::Persistence(e.to_string()))?;
        if !found {
            return Err(VaultError::NotFound {
                tenant_id,
                platform,
            });
        }

        info!(
            tenant_id = %tenant_id,
            platform = %platform,
            ok = outcome.error.is_none(),
            "Validation outcome recorded"
        );
        Ok(())
    }
}
