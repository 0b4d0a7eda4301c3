//! AdBridge — multi-tenant ad-platform integration backend.
//!
//! Main entry point: wires the identity gateway, stores, provisioning
//! service, and credential vault together once at startup and serves HTTP.

use adbridge_api::ApiServer;
use adbridge_core::config::AppConfig;
use adbridge_provisioning::{
    InMemoryIdentityGateway, InMemoryMembershipStore, InMemoryTenantStore, ProvisioningService,
};
use adbridge_vault::{CredentialVault, InMemoryCredentialStore};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "adbridge-server")]
#[command(about = "Multi-tenant ad-platform integration backend")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "ADBRIDGE__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "ADBRIDGE__API__HTTP_PORT")]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adbridge=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("AdBridge starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        min_password_length = config.provisioning.min_password_length,
        "Configuration loaded"
    );

    // Wire collaborators explicitly; no process-wide singletons. The
    // in-memory backends are the development mode; production swaps in
    // implementations backed by the hosted identity provider and database.
    let gateway = Arc::new(InMemoryIdentityGateway::new());
    let tenants = Arc::new(InMemoryTenantStore::new());
    let memberships = Arc::new(InMemoryMembershipStore::new());
    let credential_store = Arc::new(InMemoryCredentialStore::new());

    let provisioning = Arc::new(ProvisioningService::new(
        gateway,
        tenants,
        memberships,
        config.provisioning.clone(),
    ));
    let vault = Arc::new(CredentialVault::new(credential_store));

    let api_server = ApiServer::new(config, provisioning, vault);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("AdBridge is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
