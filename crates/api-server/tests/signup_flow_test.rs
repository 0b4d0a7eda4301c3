//! End-to-end router tests: signup provisioning and the credential vault
//! endpoints, driven through the axum router with in-memory backends.

use adbridge_api::ApiServer;
use adbridge_core::config::AppConfig;
use adbridge_core::tenancy::MemberRole;
use adbridge_provisioning::{
    InMemoryIdentityGateway, InMemoryMembershipStore, InMemoryTenantStore, MembershipStore,
    ProvisioningService, TenantStore,
};
use adbridge_vault::{CredentialVault, InMemoryCredentialStore};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    gateway: Arc<InMemoryIdentityGateway>,
    tenants: Arc<InMemoryTenantStore>,
    memberships: Arc<InMemoryMembershipStore>,
}

fn test_app() -> TestApp {
    let gateway = Arc::new(InMemoryIdentityGateway::new());
    let tenants = Arc::new(InMemoryTenantStore::new());
    let memberships = Arc::new(InMemoryMembershipStore::new());
    let config = AppConfig::default();

    let provisioning = Arc::new(ProvisioningService::new(
        gateway.clone(),
        tenants.clone(),
        memberships.clone(),
        config.provisioning.clone(),
    ));
    let vault = Arc::new(CredentialVault::new(Arc::new(
        InMemoryCredentialStore::new(),
    )));

    let router = ApiServer::new(config, provisioning, vault).router();
    TestApp {
        router,
        gateway,
        tenants,
        memberships,
    }
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_signup_creates_identity_tenant_and_owner_membership() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/auth/signup",
            serde_json::json!({
                "email": "a@x.com",
                "password": "secret1",
                "fullName": "Kim"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "a@x.com");

    assert_eq!(app.gateway.count(), 1);
    assert_eq!(app.tenants.count(), 1);
    assert_eq!(app.memberships.count(), 1);

    let identity_id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();
    let membership = app.memberships.get(identity_id).unwrap().unwrap();
    assert_eq!(membership.role, MemberRole::Owner);

    // Tenant was auto-named from the full name.
    let tenant = app.tenants.get(membership.tenant_id).unwrap().unwrap();
    assert!(tenant.name.contains("Kim"));
    assert!(tenant.business_number.starts_with("TEMP-"));
}

#[tokio::test]
async fn test_signup_short_password_is_rejected_without_side_effects() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/auth/signup",
            serde_json::json!({
                "email": "a@x.com",
                "password": "ab1",
                "fullName": "Kim"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("password too short"));

    assert_eq!(app.gateway.count(), 0);
    assert_eq!(app.tenants.count(), 0);
    assert_eq!(app.memberships.count(), 0);
}

#[tokio::test]
async fn test_credential_save_list_and_isolation() {
    let app = test_app();
    let t1 = Uuid::new_v4();
    let t2 = Uuid::new_v4();

    // First save, then overwrite with a new secret.
    for secret in ["s1", "s2"] {
        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/v1/tenants/{t1}/credentials/meta"),
                serde_json::json!({"app_id": "123", "app_secret": secret}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/v1/tenants/{t1}/credentials"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["payload"]["app_secret"], "s2");
    assert!(records[0]["last_validated_at"].is_null());

    // Another tenant sees nothing.
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/v1/tenants/{t2}/credentials"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let records = body_json(response).await;
    assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_credential_save_rejects_incomplete_payload() {
    let app = test_app();
    let tenant = Uuid::new_v4();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/v1/tenants/{tenant}/credentials/meta"),
            serde_json::json!({"app_id": "123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_record_validation_requires_existing_record() {
    let app = test_app();
    let tenant = Uuid::new_v4();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/tenants/{tenant}/credentials/google/validation"),
            serde_json::json!({"validated_at": "2026-08-30T00:00:00Z"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
