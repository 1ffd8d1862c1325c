//! Assembly management API server binary.
//!
//! Initializes the store and image bucket, sets up the HTTP router, and
//! starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin assembly-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `PUBLIC_BASE_URL`: External base URL for uploaded image links
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use assembly_api::config::ServerConfig;
use assembly_api::http::{create_router, AppState};
use assembly_api::store::{FullStore, MemoryObjectStore, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting assembly management API server");

    let config = ServerConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let store = Arc::new(MemoryStore::new()) as Arc<dyn FullStore>;
    let images = Arc::new(MemoryObjectStore::new(config.public_base_url.clone()));
    info!("Store initialized");

    let state = AppState::new(store, images);
    let app = create_router(state);

    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
