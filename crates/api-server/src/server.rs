//! API server — builds the router and serves HTTP plus the metrics exporter.

use crate::rest::{self, AppState};
use adbridge_core::config::AppConfig;
use adbridge_provisioning::ProvisioningService;
use adbridge_vault::CredentialVault;
use axum::routing::{get, post, put};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Main API server for the provisioning and vault endpoints.
pub struct ApiServer {
    config: AppConfig,
    provisioning: Arc<ProvisioningService>,
    vault: Arc<CredentialVault>,
}

impl ApiServer {
    pub fn new(
        config: AppConfig,
        provisioning: Arc<ProvisioningService>,
        vault: Arc<CredentialVault>,
    ) -> Self {
        Self {
            config,
            provisioning,
            vault,
        }
    }

    /// Build the application router. Exposed separately so tests can drive
    /// it without binding a socket.
    pub fn router(&self) -> Router {
        let state = AppState {
            provisioning: self.provisioning.clone(),
            vault: self.vault.clone(),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
        };

        Router::new()
            // Provisioning
            .route("/v1/auth/signup", post(rest::handle_signup))
            // Credential vault
            .route("/v1/tenants/:tenant_id/credentials", get(rest::list_credentials))
            .route(
                "/v1/tenants/:tenant_id/credentials/:platform",
                put(rest::save_credentials),
            )
            .route(
                "/v1/tenants/:tenant_id/credentials/:platform/validation",
                post(rest::record_validation),
            )
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the HTTP server (blocks until shutdown).
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = self.router();
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the Prometheus metrics exporter.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
