//! Bhajanmala API Server Binary
//!
//! Starts the catalog HTTP server over an embedded SurrealDB database.
//!
//! # Usage
//!
//! ```bash
//! # Default settings (port 3001, ./data/bhajanmala.db)
//! cargo run --bin bhajanmala-server
//!
//! # Custom port and database
//! BHAJANMALA_PORT=3002 BHAJANMALA_DB=/var/lib/bhajanmala cargo run --bin bhajanmala-server
//! ```
//!
//! # Environment Variables
//!
//! - `BHAJANMALA_PORT`: Server port (default: 3001)
//! - `BHAJANMALA_DB`: Database directory (default: ./data/bhajanmala.db)
//! - `BHAJANMALA_FEATURED`: Comma-separated featured bhajan IDs
//! - `CORS_ALLOW_ORIGIN`: Pin CORS to one origin (default: any)
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::sync::Arc;

use bhajanmala_core::{BhajanService, PartService, ReorderEngine, SurrealStore};
use bhajanmala_server::{api, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🚀 Bhajanmala API Server");
    tracing::info!("==================================");

    let config = ServerConfig::from_env();
    tracing::info!("📡 Port: {}", config.port);
    tracing::info!("📦 Database: {}", config.db_path.display());

    if let Some(parent) = config.db_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    tracing::info!("🔧 Initializing services...");
    let store: Arc<dyn bhajanmala_core::CatalogStore> =
        Arc::new(SurrealStore::new(config.db_path.clone()).await?);

    let state = api::AppState {
        bhajans: Arc::new(BhajanService::new(store.clone())),
        parts: Arc::new(PartService::new(store.clone())),
        reorder: Arc::new(ReorderEngine::new(store)),
        featured_ids: Arc::new(config.featured_ids.clone()),
    };
    tracing::info!("✅ Services initialized");

    api::start_server(state, config.port, config.cors_origin.as_deref()).await?;

    Ok(())
}
