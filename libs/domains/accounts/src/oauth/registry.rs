use core_config::{ConfigError, FromEnv, env_required};
use std::collections::HashMap;
use std::sync::Arc;

use super::provider::OAuthProvider;
use super::providers::CmbcProvider;
use crate::error::{AccountError, AccountResult};

/// Where the console lives; provider redirect targets hang off it.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Base URL without trailing slash
    pub console_url: String,
}

impl OAuthConfig {
    pub fn new(console_url: impl Into<String>) -> Self {
        let console_url: String = console_url.into();
        Self {
            console_url: console_url.trim_end_matches('/').to_string(),
        }
    }

    /// Landing page after a successful provider login
    pub fn login_success_url(&self) -> String {
        format!("{}?oauth_login=success", self.console_url)
    }
}

impl FromEnv for OAuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let console_url = env_required("CONSOLE_URL")?;
        if console_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "CONSOLE_URL".to_string(),
                details: "must not be empty".to_string(),
            });
        }
        Ok(Self::new(console_url.trim()))
    }
}

/// Provider key → provider. Built once at startup and shared read-only.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn OAuthProvider>>,
}

impl ProviderRegistry {
    pub fn from_config(config: &OAuthConfig) -> AccountResult<Self> {
        let mut registry = Self::default();
        registry.register(CmbcProvider::new(&config.console_url)?);
        Ok(registry)
    }

    pub fn register(&mut self, provider: impl OAuthProvider + 'static) {
        self.providers.insert(provider.name(), Arc::new(provider));
    }

    /// Look a provider up by key; unknown keys are [`AccountError::InvalidProvider`].
    pub fn resolve(&self, key: &str) -> AccountResult<Arc<dyn OAuthProvider>> {
        self.providers
            .get(key)
            .cloned()
            .ok_or_else(|| AccountError::InvalidProvider(key.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.providers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::providers::cmbc::CMBC_AUTH_URL;

    fn registry() -> ProviderRegistry {
        ProviderRegistry::from_config(&OAuthConfig::new("https://console.example.com/")).unwrap()
    }

    #[test]
    fn test_resolves_cmbc() {
        let provider = registry().resolve("cmbc").unwrap();
        assert_eq!(provider.authorization_url(), CMBC_AUTH_URL);
    }

    #[test]
    fn test_unknown_key_is_invalid_provider() {
        let err = registry().resolve("github").err().unwrap();
        assert!(matches!(err, AccountError::InvalidProvider(ref key) if key == "github"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        assert!(registry().resolve("CMBC").is_err());
        assert_eq!(registry().names(), vec!["cmbc"]);
    }

    #[test]
    fn test_success_url_strips_trailing_slash() {
        let config = OAuthConfig::new("https://console.example.com/");
        assert_eq!(
            config.login_success_url(),
            "https://console.example.com?oauth_login=success"
        );
    }

    #[test]
    fn test_from_env_requires_console_url() {
        temp_env::with_var_unset("CONSOLE_URL", || {
            let err = OAuthConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "CONSOLE_URL"));
        });

        temp_env::with_var("CONSOLE_URL", Some("https://console.example.com"), || {
            let config = OAuthConfig::from_env().unwrap();
            assert_eq!(config.console_url, "https://console.example.com");
        });
    }
}
