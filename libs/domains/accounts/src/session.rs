//! The logged-in principal as stored in the cookie session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::{Expiry, Session};
use uuid::Uuid;

use crate::error::AccountResult;
use crate::models::Account;

pub const SESSION_ACCOUNT_KEY: &str = "account";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAccount {
    pub account_id: Uuid,
    pub provider: String,
    pub logged_in_at: DateTime<Utc>,
}

/// Log `account` in on `session`.
///
/// Anything left from an earlier session is dropped and the id is rotated
/// before the principal is written, so a pre-login session id never becomes
/// an authenticated one.
pub async fn establish_session(
    session: &Session,
    account: &Account,
    provider: &str,
    expiry: Expiry,
) -> AccountResult<SessionAccount> {
    session.clear().await;
    session.cycle_id().await?;

    let principal = SessionAccount {
        account_id: account.id,
        provider: provider.to_string(),
        logged_in_at: Utc::now(),
    };
    session.insert(SESSION_ACCOUNT_KEY, &principal).await?;
    session.set_expiry(Some(expiry));

    Ok(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountStatus, CreateAccount, InterfaceLanguage};
    use std::sync::Arc;
    use tower_sessions::MemoryStore;
    use tower_sessions::cookie::time::Duration;

    fn account() -> Account {
        Account::new(CreateAccount {
            email: "u1".into(),
            name: "u1".into(),
            status: AccountStatus::Active,
            interface_language: InterfaceLanguage::EnUs,
            initialized_at: Some(Utc::now()),
        })
    }

    #[tokio::test]
    async fn test_establish_replaces_previous_data() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session.insert("csrf", "stale").await.unwrap();

        let account = account();
        let principal = establish_session(
            &session,
            &account,
            "cmbc",
            Expiry::OnInactivity(Duration::days(30)),
        )
        .await
        .unwrap();

        assert_eq!(principal.account_id, account.id);
        assert!(session.get::<String>("csrf").await.unwrap().is_none());
        let stored: Option<SessionAccount> = session.get(SESSION_ACCOUNT_KEY).await.unwrap();
        assert_eq!(stored, Some(principal));
        assert!(matches!(session.expiry(), Some(Expiry::OnInactivity(_))));
    }
}
