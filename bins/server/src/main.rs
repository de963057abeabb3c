//! Tally API Server
//!
//! Main entry point for the Tally ledger service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, create_router};
use tally_shared::AppConfig;
use tally_store::LedgerRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Create the ledger repository
    let repo = LedgerRepository::new();

    // Optionally seed demo data for local development
    if config.server.seed_demo {
        let demo_user = tally_store::seed::seed_demo(&repo).await?;
        info!(user_id = %demo_user, "Demo data available");
    }

    // Create application state and router
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(repo, config);
    let app = create_router(state);

    // Start server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
