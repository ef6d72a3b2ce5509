use sea_orm::ConnectOptions;
use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse, env_required};

/// Pool settings for the account store.
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Also used as the acquire timeout
    pub connect_timeout_secs: u64,
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout_secs: 8,
            sqlx_logging: false,
        }
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let timeout = Duration::from_secs(self.connect_timeout_secs);
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .sqlx_logging(self.sqlx_logging);
        opt
    }
}

/// `DATABASE_URL` is required. Optional: `DB_MAX_CONNECTIONS` (20),
/// `DB_MIN_CONNECTIONS` (2), `DB_CONNECT_TIMEOUT_SECS` (8),
/// `DB_SQLX_LOGGING` (false).
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            url: env_required("DATABASE_URL")?,
            max_connections: env_parse("DB_MAX_CONNECTIONS", "20")?,
            min_connections: env_parse("DB_MIN_CONNECTIONS", "2")?,
            connect_timeout_secs: env_parse("DB_CONNECT_TIMEOUT_SECS", "8")?,
            sqlx_logging: env_parse("DB_SQLX_LOGGING", "false")?,
        };

        if config.min_connections > config.max_connections {
            return Err(ConfigError::InvalidValue {
                key: "DB_MIN_CONNECTIONS".to_string(),
                details: format!(
                    "{} exceeds DB_MAX_CONNECTIONS ({})",
                    config.min_connections, config.max_connections
                ),
            });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_pool_defaults() {
        let config = PostgresConfig::new("postgresql://localhost/console");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        let _options = config.connect_options();
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/console")),
                ("DB_MAX_CONNECTIONS", None),
                ("DB_MIN_CONNECTIONS", None),
                ("DB_CONNECT_TIMEOUT_SECS", None),
            ],
            || {
                let config = PostgresConfig::from_env().unwrap();
                assert_eq!(config.url, "postgresql://localhost/console");
                assert_eq!(config.max_connections, 20);
                assert_eq!(config.min_connections, 2);
                assert_eq!(config.connect_timeout_secs, 8);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_missing_url() {
        temp_env::with_var_unset("DATABASE_URL", || {
            let err = PostgresConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("DATABASE_URL"));
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_rejects_inverted_pool() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/console")),
                ("DB_MAX_CONNECTIONS", Some("4")),
                ("DB_MIN_CONNECTIONS", Some("8")),
            ],
            || {
                let err = PostgresConfig::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::InvalidValue { .. }));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_invalid_number() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/console")),
                ("DB_MAX_CONNECTIONS", Some("lots")),
            ],
            || {
                let err = PostgresConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
            },
        );
    }
}
