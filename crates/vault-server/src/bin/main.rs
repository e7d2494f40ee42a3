//! Paykey Vault server
//!
//! Keys come from the environment (`ENCRYPTION_KEY`, `JWT_SECRET`,
//! `TOKEN_VALIDITY_HOURS`, `PUBLIC_KEY_PREFIXES`). When a key is missing the
//! built-in default is used and a warning is logged.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use vault_core::{JsonFileUserStore, MemoryUserStore, Settings, UserStore, VaultServices};
use vault_server::VaultServer;

/// Paykey Vault - encrypted storage for payment provider credentials
#[derive(Parser, Debug)]
#[command(name = "paykey-vault")]
#[command(version)]
#[command(about = "Paykey Vault - encrypted storage for payment provider credentials")]
struct Args {
    /// Port for the HTTP server
    #[arg(long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Path of the JSON user store (defaults to the platform data directory)
    #[arg(long, env = "VAULT_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Keep users in memory only; everything is lost on exit
    #[arg(long, conflicts_with = "data_file")]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let settings = Settings::from_env().map_err(|e| format!("Invalid configuration: {}", e))?;

    let store: Arc<dyn UserStore> = if args.in_memory {
        info!("Using in-memory user store");
        Arc::new(MemoryUserStore::new())
    } else {
        let path = match args.data_file {
            Some(path) => path,
            None => JsonFileUserStore::default_path()?,
        };
        let store = JsonFileUserStore::open(path).await?;
        info!("Using user store at {:?}", store.path());
        Arc::new(store)
    };

    let services = Arc::new(VaultServices::new(&settings, store)?);

    VaultServer::new(services, args.port).run().await?;

    Ok(())
}
