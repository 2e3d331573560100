//! Contact Book - Main entry point
//!
//! This is the main executable for the contact book, which provides a Model
//! Context Protocol (MCP) interface to the address book over stdio.

use anyhow::Result;
use contact_book::repositories::{ContactRepository, UserRepository};
use contact_book::services::{ContactService, SessionService};
use contact_book::{
    AccessPolicy, Config, ContactBookServer, ContactServiceImpl, InMemoryContactRepository,
    InMemoryUserRepository, Metrics, SessionServiceImpl,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let default_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize repositories
    let contact_repo = match &config.data_file {
        Some(path) => {
            info!(path = %path.display(), "Using contact snapshot file");
            Arc::new(InMemoryContactRepository::with_snapshot(path)?) as Arc<dyn ContactRepository>
        }
        None => {
            info!("No data file configured; contacts live in memory only");
            Arc::new(InMemoryContactRepository::new()) as Arc<dyn ContactRepository>
        }
    };
    let user_repo = Arc::new(InMemoryUserRepository::new()) as Arc<dyn UserRepository>;

    let metrics = Metrics::new();
    let policy = AccessPolicy::new(config.allow_anonymous_read);

    let session_service = SessionServiceImpl::new(user_repo, policy, metrics.clone());
    if let Some(admin) = config.admin_account() {
        let user = session_service.bootstrap_admin(admin).await?;
        info!(username = %user.username, "Admin account ready");
    } else {
        info!("No admin account configured; login is impossible until one is seeded");
    }

    let contact_service = Arc::new(ContactServiceImpl::new(contact_repo, policy, metrics.clone()))
        as Arc<dyn ContactService>;
    let session_service = Arc::new(session_service) as Arc<dyn SessionService>;

    let server = ContactBookServer::new(contact_service, session_service, metrics);
    info!("Contact book server initialized");

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    contact_book::server::run_server(server).await?;

    info!("Contact book server shutdown complete");
    Ok(())
}
