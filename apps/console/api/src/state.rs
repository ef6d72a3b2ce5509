//! Shared application state.

use database::postgres::DatabaseConnection;

/// Cloned into every handler; the connection is a shared pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
}
