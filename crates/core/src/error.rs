use crate::credentials::AdPlatform;
use thiserror::Error;
use uuid::Uuid;

pub type ProvisioningResult<T> = Result<T, ProvisioningError>;
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors surfaced by the account-provisioning saga. Each non-validation
/// variant names the saga step that failed and carries the downstream cause.
/// The cause is for server-side logs only; callers get [`public_message`].
///
/// [`public_message`]: ProvisioningError::public_message
#[derive(Error, Debug)]
pub enum ProvisioningError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Identity creation failed: {cause}")]
    Identity { cause: String },

    #[error("Tenant creation failed: {cause}")]
    Tenant { cause: String },

    #[error("Membership creation failed: {cause}")]
    Membership { cause: String },
}

impl ProvisioningError {
    /// Generic, user-visible message for this error category. Downstream
    /// identifiers and causes never leave the server.
    pub fn public_message(&self) -> String {
        match self {
            ProvisioningError::Validation(msg) => msg.clone(),
            ProvisioningError::Identity { .. } => "Failed to create your account.".to_string(),
            ProvisioningError::Tenant { .. } => "Failed to create your organization.".to_string(),
            ProvisioningError::Membership { .. } => {
                "Failed to create your user profile.".to_string()
            }
        }
    }

    /// Name of the saga step this error belongs to, for logs and metrics.
    pub fn step(&self) -> &'static str {
        match self {
            ProvisioningError::Validation(_) => "validate",
            ProvisioningError::Identity { .. } => "create_identity",
            ProvisioningError::Tenant { .. } => "create_tenant",
            ProvisioningError::Membership { .. } => "create_membership",
        }
    }
}

/// Errors surfaced by the per-tenant credential vault.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Credential schema error: {0}")]
    Schema(String),

    #[error("Credential store error: {0}")]
    Persistence(String),

    #[error("No {platform} credentials stored for tenant {tenant_id}")]
    NotFound {
        tenant_id: Uuid,
        platform: AdPlatform,
    },
}
