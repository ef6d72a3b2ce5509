use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Principal reported by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthUserInfo {
    /// Stable id at the provider; the link key
    pub id: String,
    pub name: String,
    /// Used for the email fallback match and as the email of new accounts
    pub email: String,
}

impl OAuthUserInfo {
    /// Providers that only hand back an opaque user id
    pub fn from_external_id(user_id: &str) -> Self {
        Self {
            id: user_id.to_string(),
            name: user_id.to_string(),
            email: user_id.to_string(),
        }
    }
}

/// Query string of the provider callback
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeQuery {
    /// User id at the provider
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl AuthorizeQuery {
    /// The user id, unless missing or blank
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}
