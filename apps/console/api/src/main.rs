use axum_helpers::server::{create_production_app, create_router, health_router};
use axum_helpers::session::create_session_layer;
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name).await?;
    }

    let state = AppState { config, db };

    let api_routes = api::routes(&state)?;

    // Probes are merged outside the session layer and stay cookie-free
    let app = create_router::<openapi::ApiDoc>("/console/api", api_routes)
        .layer(create_session_layer(&state.config.session))
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting console API");

    let db = state.db.clone();
    create_production_app(app, &state.config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing database connections");
        match db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Console API shutdown complete");
    Ok(())
}
