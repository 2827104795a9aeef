//! # Cruddapp Server
//!
//! JSON host for the journal-entry program accessors.
//!
//! ## Environment Setup
//! Configure through the environment or a `.env` file:
//! ```bash
//! CRUDDAPP_CLUSTER=devnet
//! SOLANA_KEYPAIR_PATH=~/.config/solana/id.json
//! RUST_LOG=info,cruddapp_client=debug
//! ```
//!
//! ## Health Check
//! ```bash
//! curl http://localhost:3000/ping
//! ```

use std::sync::Arc;

use anyhow::Result;
use solana_sdk::signature::{Keypair, Signer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cruddapp_client::connection::load_keypair;
use cruddapp_client::server::{self, AppState};
use cruddapp_client::{NetworkContext, Notifier, ProgramAccessor, QueryCache, ToastLog, config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();

    tracing::info!("Starting Cruddapp server...");
    tracing::info!("Package: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = config::init()?;

    let signer = match load_keypair(&config.keypair_path) {
        Ok(keypair) => keypair,
        Err(e) => {
            tracing::warn!(
                "{}; signing with an ephemeral keypair, transactions will need funding",
                e
            );
            Keypair::new()
        }
    };
    tracing::info!("Signing wallet: {}", signer.pubkey());

    let ctx = NetworkContext::connect(config.cluster.clone(), Arc::new(signer));
    let cache = Arc::new(QueryCache::new(config.query_stale_time));
    let toasts = Arc::new(ToastLog::new(config.notification_capacity));
    let program = Arc::new(ProgramAccessor::new(
        ctx,
        cache,
        toasts.clone() as Arc<dyn Notifier>,
    ));

    server::start(&config.server, AppState { program, toasts }).await
}
