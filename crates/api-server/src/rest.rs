//! REST handlers for signup provisioning and per-tenant credential
//! management.
//!
//! Error bodies are `{"error": <message>}`. Validation problems map to 400,
//! missing vault records to 404, everything downstream to 500. User-visible
//! messages stay generic; full causes go to the server log only.

use adbridge_core::credentials::{AdPlatform, CredentialRecord, ValidationOutcome};
use adbridge_core::error::{ProvisioningError, VaultError};
use adbridge_provisioning::{ProvisionRequest, ProvisioningService};
use adbridge_vault::CredentialVault;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;
use uuid::Uuid;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub provisioning: Arc<ProvisioningService>,
    pub vault: Arc<CredentialVault>,
    pub node_id: String,
    pub start_time: Instant,
}

/// Signup request body. `hospitalName` is an accepted alias for the tenant
/// name, kept for the original clinic-facing clients.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default, alias = "hospitalName")]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub business_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub user: SignupUser,
}

#[derive(Debug, Serialize)]
pub struct SignupUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn provisioning_error_reply(err: &ProvisioningError) -> ErrorReply {
    let status = match err {
        ProvisioningError::Validation(_) => StatusCode::BAD_REQUEST,
        ProvisioningError::Identity { .. }
        | ProvisioningError::Tenant { .. }
        | ProvisioningError::Membership { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.public_message(),
        }),
    )
}

fn vault_error_reply(err: &VaultError) -> ErrorReply {
    match err {
        VaultError::Schema(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: msg.clone() }),
        ),
        VaultError::Persistence(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Credential store is unavailable.".to_string(),
            }),
        ),
        VaultError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No credentials stored for this platform.".to_string(),
            }),
        ),
    }
}

/// POST /v1/auth/signup — run the provisioning saga for one signup.
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ErrorReply> {
    let email = request.email.trim().to_lowercase();
    let provision = ProvisionRequest {
        email: email.clone(),
        password: request.password,
        full_name: request.full_name,
        tenant_name: request.tenant_name,
        business_number: request.business_number,
    };

    match state.provisioning.provision(&provision) {
        Ok(outcome) => {
            metrics::counter!("signup.provisioned").increment(1);
            Ok(Json(SignupResponse {
                success: true,
                message: "Signup completed.".to_string(),
                user: SignupUser {
                    id: outcome.identity_id,
                    email,
                },
            }))
        }
        Err(err) => {
            error!(step = err.step(), error = %err, "Signup provisioning failed");
            metrics::counter!("signup.errors", "step" => err.step()).increment(1);
            Err(provisioning_error_reply(&err))
        }
    }
}

/// PUT /v1/tenants/:tenant_id/credentials/:platform — upsert a secret bundle.
pub async fn save_credentials(
    State(state): State<AppState>,
    Path((tenant_id, platform)): Path<(Uuid, AdPlatform)>,
    Json(payload): Json<serde_json::Value>,
) -> Result<StatusCode, ErrorReply> {
    match state.vault.save(tenant_id, platform, payload) {
        Ok(()) => {
            metrics::counter!("vault.credentials.saved").increment(1);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            error!(tenant_id = %tenant_id, platform = %platform, error = %err, "Credential save failed");
            Err(vault_error_reply(&err))
        }
    }
}

/// GET /v1/tenants/:tenant_id/credentials — list a tenant's records.
pub async fn list_credentials(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<Vec<CredentialRecord>>, ErrorReply> {
    state
        .vault
        .list(tenant_id)
        .map(Json)
        .map_err(|err| {
            error!(tenant_id = %tenant_id, error = %err, "Credential list failed");
            vault_error_reply(&err)
        })
}

/// POST /v1/tenants/:tenant_id/credentials/:platform/validation — the
/// validation worker's mutation point.
pub async fn record_validation(
    State(state): State<AppState>,
    Path((tenant_id, platform)): Path<(Uuid, AdPlatform)>,
    Json(outcome): Json<ValidationOutcome>,
) -> Result<StatusCode, ErrorReply> {
    match state.vault.record_validation(tenant_id, platform, &outcome) {
        Ok(()) => {
            metrics::counter!("vault.validations.recorded").increment(1);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            error!(tenant_id = %tenant_id, platform = %platform, error = %err, "Validation record failed");
            Err(vault_error_reply(&err))
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — Readiness probe for Kubernetes.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness probe for Kubernetes.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
