use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Cookie session settings shared by the console apps
#[derive(Clone, Debug)]
pub struct SessionSettings {
    /// Name of the session cookie
    pub cookie_name: String,
    /// Set the `Secure` flag (HTTPS deployments)
    pub secure: bool,
    /// Lifetime of a "remember me" session, refreshed on activity
    pub remember_for: Duration,
}

impl SessionSettings {
    /// Expiry to apply to a session once the user asked to be remembered
    pub fn remember_expiry(&self) -> Expiry {
        Expiry::OnInactivity(self.remember_for)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            secure: false,
            remember_for: Duration::days(30),
        }
    }
}

/// Session layer backed by an in-process store.
///
/// Sessions end with the browser unless a handler upgrades them with
/// [`SessionSettings::remember_expiry`]. `SameSite=Lax` so the cookie is sent
/// on the top-level redirect back from the identity provider.
pub fn create_session_layer(settings: &SessionSettings) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(settings.cookie_name.clone())
        .with_secure(settings.secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnSessionEnd)
}
