use super::types::OAuthUserInfo;

/// An identity provider the console can send users to.
pub trait OAuthProvider: Send + Sync {
    /// Registry key, also stored as `account_integrates.provider`
    fn name(&self) -> &'static str;

    /// Where the login route redirects the browser
    fn authorization_url(&self) -> String;

    /// Map the callback's user id to the principal it identifies
    fn user_info(&self, user_id: &str) -> OAuthUserInfo {
        OAuthUserInfo::from_external_id(user_id)
    }
}
