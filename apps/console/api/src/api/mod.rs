pub mod health;

use axum::{Router, routing::get};
use domain_accounts::{
    AccountLinkingService, AuthState, PgAccountRepository, ProviderRegistry, handlers,
};

use crate::state::AppState;

/// Console API routes, relative to `/console/api`
pub fn routes(state: &AppState) -> eyre::Result<Router> {
    let config = &state.config;
    let registry = ProviderRegistry::from_config(&config.oauth)?;
    tracing::info!(providers = ?registry.names(), "OAuth providers registered");

    let auth = AuthState::new(
        AccountLinkingService::new(PgAccountRepository::new(state.db.clone())),
        registry,
        config.oauth.clone(),
        config.session.clone(),
    );

    Ok(handlers::router(auth))
}

/// `GET /ready` with a database round trip
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
