use axum_helpers::SessionSettings;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_accounts::OAuthConfig;
use tower_sessions::cookie::time::Duration;

pub use core_config::Environment;

/// Console API configuration, composed from the shared config pieces
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub oauth: OAuthConfig,
    pub session: SessionSettings,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        let remember_days: i64 = env_parse("SESSION_REMEMBER_DAYS", "30")?;
        if remember_days <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "SESSION_REMEMBER_DAYS".to_string(),
                details: format!("expected a positive number of days, got {}", remember_days),
            });
        }

        Ok(Self {
            app: app_info!(),
            database: PostgresConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment,
            oauth: OAuthConfig::from_env()?,
            session: SessionSettings {
                cookie_name: "console_session".to_string(),
                secure: environment.use_secure_cookies(),
                remember_for: Duration::days(remember_days),
            },
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
        })
    }
}
