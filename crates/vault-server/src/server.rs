//! HTTP server lifecycle

use std::sync::Arc;

use tracing::info;
use vault_core::VaultServices;

use crate::routes::router;

/// Paykey Vault HTTP server
pub struct VaultServer {
    services: Arc<VaultServices>,
    port: u16,
}

impl VaultServer {
    /// Create a new server
    pub fn new(services: Arc<VaultServices>, port: u16) -> Self {
        Self { services, port }
    }

    /// Run the HTTP server until Ctrl-C
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(self.services.clone());

        let addr = format!("0.0.0.0:{}", self.port);
        info!("Starting Paykey Vault HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
