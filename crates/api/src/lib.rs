//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for accounts, transactions, and balances
//! - Payment-hint resolution at the request boundary
//! - A consistent JSON error envelope

pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use tally_core::ledger::AliasTable;
use tally_shared::AppConfig;
use tally_store::LedgerRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger repository.
    pub repo: LedgerRepository,
    /// Payment alias table, built from configuration.
    pub aliases: Arc<AliasTable>,
    /// Application configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Builds state from a repository and loaded configuration.
    #[must_use]
    pub fn new(repo: LedgerRepository, config: AppConfig) -> Self {
        let aliases = Arc::new(AliasTable::new(config.resolver.aliases.clone()));
        Self {
            repo,
            aliases,
            config: Arc::new(config),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
