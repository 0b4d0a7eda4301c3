//! The signup provisioning service: validates the request, then runs the
//! identity → tenant → membership saga.

use crate::gateway::{IdentityGateway, NewIdentity};
use crate::saga::{run_saga, SagaStep};
use crate::stores::{MembershipStore, NewTenant, TenantStore};
use adbridge_core::config::ProvisioningConfig;
use adbridge_core::error::{ProvisioningError, ProvisioningResult};
use adbridge_core::tenancy::{Identity, MemberRole, Membership, Tenant};
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Signup request as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub tenant_name: Option<String>,
    pub business_number: Option<String>,
}

/// Identifiers produced by a successful provisioning run.
#[derive(Debug, Clone, Copy)]
pub struct ProvisionOutcome {
    pub identity_id: Uuid,
    pub tenant_id: Uuid,
}

/// Shared context threaded through the saga steps. Each step records what it
/// created so later steps and compensations can reach it.
#[derive(Default)]
struct ProvisionCtx {
    identity: Option<Identity>,
    tenant: Option<Tenant>,
    membership: Option<Membership>,
}

/// Orchestrates the three-step signup saga over injected collaborators.
/// Construct once at startup and share.
pub struct ProvisioningService {
    gateway: Arc<dyn IdentityGateway>,
    tenants: Arc<dyn TenantStore>,
    memberships: Arc<dyn MembershipStore>,
    policy: ProvisioningConfig,
}

impl ProvisioningService {
    pub fn new(
        gateway: Arc<dyn IdentityGateway>,
        tenants: Arc<dyn TenantStore>,
        memberships: Arc<dyn MembershipStore>,
        policy: ProvisioningConfig,
    ) -> Self {
        Self {
            gateway,
            tenants,
            memberships,
            policy,
        }
    }

    /// Provision one signup: create identity, tenant, and owner membership,
    /// strictly in that order. A step failure rolls back everything the
    /// earlier steps committed and surfaces that step's error.
    pub fn provision(&self, request: &ProvisionRequest) -> ProvisioningResult<ProvisionOutcome> {
        self.validate(request)?;

        let mut ctx = ProvisionCtx::default();
        let steps = vec![
            self.identity_step(request),
            self.tenant_step(request),
            self.membership_step(),
        ];

        run_saga(&mut ctx, &steps)?;

        let identity = ctx.identity.ok_or_else(|| ProvisioningError::Identity {
            cause: "saga completed without an identity in context".to_string(),
        })?;
        let tenant = ctx.tenant.ok_or_else(|| ProvisioningError::Tenant {
            cause: "saga completed without a tenant in context".to_string(),
        })?;

        info!(
            identity_id = %identity.id,
            tenant_id = %tenant.id,
            "Provisioning completed"
        );
        Ok(ProvisionOutcome {
            identity_id: identity.id,
            tenant_id: tenant.id,
        })
    }

    /// Fail-fast input checks. Runs before any side effect.
    fn validate(&self, request: &ProvisionRequest) -> ProvisioningResult<()> {
        if request.email.trim().is_empty()
            || request.password.is_empty()
            || request.full_name.trim().is_empty()
        {
            return Err(ProvisioningError::Validation(
                "email, password, and full name are required".to_string(),
            ));
        }
        // Count characters, not bytes: Hangul passwords are multi-byte and
        // must be measured the way the user typed them.
        if request.password.chars().count() < self.policy.min_password_length {
            return Err(ProvisioningError::Validation(format!(
                "password too short (minimum {} characters)",
                self.policy.min_password_length
            )));
        }
        Ok(())
    }

    /// Step 1: create the authentication identity. Nothing to compensate if
    /// it fails; the compensation deletes the identity when a later step
    /// fails.
    fn identity_step(&self, request: &ProvisionRequest) -> SagaStep<ProvisionCtx, ProvisioningError> {
        let new_identity = NewIdentity {
            email: request.email.clone(),
            password: request.password.clone(),
            full_name: request.full_name.clone(),
            confirmed: self.policy.auto_confirm_identities,
        };
        let gateway = self.gateway.clone();
        let gateway_undo = self.gateway.clone();

        SagaStep::new(
            "create_identity",
            move |ctx: &mut ProvisionCtx| {
                let identity = gateway
                    .create_identity(&new_identity)
                    .map_err(|e| ProvisioningError::Identity {
                        cause: e.to_string(),
                    })?;
                ctx.identity = Some(identity);
                Ok(())
            },
            move |ctx: &ProvisionCtx| match &ctx.identity {
                Some(identity) => gateway_undo.delete_identity(identity.id),
                None => Ok(()),
            },
        )
    }

    /// Step 2: create the owning tenant. Name and business number fall back
    /// to generated defaults when the signup omitted them.
    fn tenant_step(&self, request: &ProvisionRequest) -> SagaStep<ProvisionCtx, ProvisioningError> {
        let name = request
            .tenant_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| default_tenant_name(&request.full_name));
        let business_number = request
            .business_number
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(placeholder_business_number);
        let tenants = self.tenants.clone();
        let tenants_undo = self.tenants.clone();

        SagaStep::new(
            "create_tenant",
            move |ctx: &mut ProvisionCtx| {
                let tenant = tenants
                    .insert(NewTenant {
                        name: name.clone(),
                        business_number: business_number.clone(),
                    })
                    .map_err(|e| ProvisioningError::Tenant {
                        cause: e.to_string(),
                    })?;
                ctx.tenant = Some(tenant);
                Ok(())
            },
            move |ctx: &ProvisionCtx| match &ctx.tenant {
                Some(tenant) => tenants_undo.delete(tenant.id),
                None => Ok(()),
            },
        )
    }

    /// Step 3: create the owner membership tying the identity to the tenant.
    fn membership_step(&self) -> SagaStep<ProvisionCtx, ProvisioningError> {
        let memberships = self.memberships.clone();
        let memberships_undo = self.memberships.clone();

        SagaStep::new(
            "create_membership",
            move |ctx: &mut ProvisionCtx| {
                let identity = ctx.identity.as_ref().ok_or_else(|| {
                    ProvisioningError::Membership {
                        cause: "no identity in saga context".to_string(),
                    }
                })?;
                let tenant = ctx.tenant.as_ref().ok_or_else(|| {
                    ProvisioningError::Membership {
                        cause: "no tenant in saga context".to_string(),
                    }
                })?;

                // First membership of a new tenant is always the owner.
                let membership = memberships
                    .insert(Membership {
                        id: identity.id,
                        tenant_id: tenant.id,
                        email: identity.email.clone(),
                        full_name: identity.full_name.clone(),
                        role: MemberRole::Owner,
                    })
                    .map_err(|e| ProvisioningError::Membership {
                        cause: e.to_string(),
                    })?;
                ctx.membership = Some(membership);
                Ok(())
            },
            move |ctx: &ProvisionCtx| match &ctx.membership {
                Some(membership) => memberships_undo.delete(membership.id),
                None => Ok(()),
            },
        )
    }
}

/// Default tenant name when the signup form left it blank.
fn default_tenant_name(full_name: &str) -> String {
    format!("{}'s organization", full_name.trim())
}

/// Placeholder business registration number: timestamp plus a random
/// suffix. Not guaranteed globally unique; real numbers arrive later via
/// tenant settings.
fn placeholder_business_number() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!("TEMP-{}-{}", Utc::now().timestamp_millis(), suffix)
}
