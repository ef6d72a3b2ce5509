use oauth2::{AuthUrl, RedirectUrl};

use crate::error::{AccountError, AccountResult};
use crate::oauth::provider::OAuthProvider;

/// Login page of the CMBC low-code portal. It takes no query parameters and
/// calls back with `?userId=`.
pub const CMBC_AUTH_URL: &str =
    "https://low-code-content.paas.cmbchina.com/front/view?pageId=o7i111c7Bw";

pub struct CmbcProvider {
    auth_url: AuthUrl,
    redirect_url: RedirectUrl,
}

impl CmbcProvider {
    pub const NAME: &'static str = "cmbc";

    pub fn new(console_url: &str) -> AccountResult<Self> {
        let auth_url = AuthUrl::new(CMBC_AUTH_URL.to_string())
            .map_err(|e| AccountError::Internal(format!("Invalid auth URL: {}", e)))?;
        let redirect_url = RedirectUrl::new(format!(
            "{}/console/api/oauth/authorize/{}",
            console_url,
            Self::NAME
        ))
        .map_err(|e| AccountError::Internal(format!("Invalid redirect URL: {}", e)))?;

        Ok(Self {
            auth_url,
            redirect_url,
        })
    }

    /// Callback URL registered with the portal
    pub fn redirect_url(&self) -> &str {
        self.redirect_url.url().as_str()
    }
}

impl OAuthProvider for CmbcProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn authorization_url(&self) -> String {
        self.auth_url.url().to_string()
    }
}
