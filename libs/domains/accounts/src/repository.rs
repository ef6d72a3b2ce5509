use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};
use crate::models::{Account, AccountIntegrate, AccountStatus, CreateAccount};

/// Persistence for accounts and their provider links.
///
/// Implementations must keep `(provider, open_id)` and `(account_id, provider)`
/// unique across links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Account linked to `open_id` at `provider`
    async fn find_by_open_id(&self, provider: &str, open_id: &str)
    -> AccountResult<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> AccountResult<Option<Account>>;

    /// Insert an account together with its first link, atomically
    async fn create_with_integrate(
        &self,
        input: CreateAccount,
        provider: &str,
        open_id: &str,
    ) -> AccountResult<Account>;

    /// Upsert the account's link for `provider`, replacing its `open_id` and
    /// clearing the stored token
    async fn link_integrate(
        &self,
        account_id: Uuid,
        provider: &str,
        open_id: &str,
    ) -> AccountResult<AccountIntegrate>;

    /// Mark the account active and stamp `initialized_at`
    async fn activate(&self, id: Uuid, at: DateTime<Utc>) -> AccountResult<Account>;

    async fn update_last_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        ip: Option<String>,
    ) -> AccountResult<()>;
}

#[derive(Debug, Default)]
struct Store {
    accounts: HashMap<Uuid, Account>,
    integrates: Vec<AccountIntegrate>,
}

impl Store {
    fn link_taken(&self, provider: &str, open_id: &str, except_account: Option<Uuid>) -> bool {
        self.integrates.iter().any(|l| {
            l.provider == provider && l.open_id == open_id && Some(l.account_id) != except_account
        })
    }
}

/// In-memory implementation of AccountRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account as-is, e.g. one registered outside the provider flow
    pub async fn insert_account(&self, account: Account) {
        self.store
            .write()
            .await
            .accounts
            .insert(account.id, account);
    }

    pub async fn get(&self, id: Uuid) -> Option<Account> {
        self.store.read().await.accounts.get(&id).cloned()
    }

    pub async fn accounts(&self) -> Vec<Account> {
        self.store.read().await.accounts.values().cloned().collect()
    }

    pub async fn integrates(&self) -> Vec<AccountIntegrate> {
        self.store.read().await.integrates.clone()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_open_id(
        &self,
        provider: &str,
        open_id: &str,
    ) -> AccountResult<Option<Account>> {
        let store = self.store.read().await;
        Ok(store
            .integrates
            .iter()
            .find(|l| l.provider == provider && l.open_id == open_id)
            .and_then(|l| store.accounts.get(&l.account_id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AccountResult<Option<Account>> {
        let store = self.store.read().await;
        Ok(store.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn create_with_integrate(
        &self,
        input: CreateAccount,
        provider: &str,
        open_id: &str,
    ) -> AccountResult<Account> {
        let mut store = self.store.write().await;

        if store.accounts.values().any(|a| a.email == input.email) {
            return Err(AccountError::Internal(format!(
                "duplicate account email '{}'",
                input.email
            )));
        }
        if store.link_taken(provider, open_id, None) {
            return Err(AccountError::Internal(format!(
                "{} identity '{}' is already linked",
                provider, open_id
            )));
        }

        let account = Account::new(input);
        store
            .integrates
            .push(AccountIntegrate::new(account.id, provider, open_id));
        store.accounts.insert(account.id, account.clone());

        tracing::info!(account_id = %account.id, provider, "Created account");
        Ok(account)
    }

    async fn link_integrate(
        &self,
        account_id: Uuid,
        provider: &str,
        open_id: &str,
    ) -> AccountResult<AccountIntegrate> {
        let mut store = self.store.write().await;

        if !store.accounts.contains_key(&account_id) {
            return Err(AccountError::NotFound(account_id));
        }
        if store.link_taken(provider, open_id, Some(account_id)) {
            return Err(AccountError::Internal(format!(
                "{} identity '{}' is linked to another account",
                provider, open_id
            )));
        }

        let existing = store
            .integrates
            .iter()
            .position(|l| l.account_id == account_id && l.provider == provider);

        let link = match existing {
            Some(idx) => {
                let link = &mut store.integrates[idx];
                link.open_id = open_id.to_string();
                link.encrypted_token = String::new();
                link.updated_at = Utc::now();
                link.clone()
            }
            None => {
                let link = AccountIntegrate::new(account_id, provider, open_id);
                store.integrates.push(link.clone());
                link
            }
        };

        Ok(link)
    }

    async fn activate(&self, id: Uuid, at: DateTime<Utc>) -> AccountResult<Account> {
        let mut store = self.store.write().await;
        let account = store
            .accounts
            .get_mut(&id)
            .ok_or(AccountError::NotFound(id))?;

        account.status = AccountStatus::Active;
        account.initialized_at = Some(at);
        account.updated_at = at;
        Ok(account.clone())
    }

    async fn update_last_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        ip: Option<String>,
    ) -> AccountResult<()> {
        let mut store = self.store.write().await;
        let account = store
            .accounts
            .get_mut(&id)
            .ok_or(AccountError::NotFound(id))?;

        account.last_login_at = Some(at);
        account.last_login_ip = ip;
        account.updated_at = at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InterfaceLanguage;

    fn input(email: &str) -> CreateAccount {
        CreateAccount {
            email: email.to_string(),
            name: email.to_string(),
            status: AccountStatus::Active,
            interface_language: InterfaceLanguage::EnUs,
            initialized_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn test_create_with_integrate_is_findable_by_link() {
        let repo = InMemoryAccountRepository::new();
        let account = repo
            .create_with_integrate(input("u1"), "cmbc", "u1")
            .await
            .unwrap();

        let found = repo.find_by_open_id("cmbc", "u1").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(account.id));
        assert!(repo.find_by_open_id("other", "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_identity_is_rejected() {
        let repo = InMemoryAccountRepository::new();
        repo.create_with_integrate(input("u1"), "cmbc", "u1")
            .await
            .unwrap();

        let err = repo
            .create_with_integrate(input("someone-else"), "cmbc", "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Internal(_)));
        assert_eq!(repo.accounts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_link_upserts_per_provider() {
        let repo = InMemoryAccountRepository::new();
        let account = repo
            .create_with_integrate(input("u1"), "cmbc", "old-id")
            .await
            .unwrap();

        let link = repo.link_integrate(account.id, "cmbc", "new-id").await.unwrap();
        assert_eq!(link.open_id, "new-id");
        assert_eq!(link.encrypted_token, "");

        let links = repo.integrates().await;
        assert_eq!(links.len(), 1);
        assert!(repo.find_by_open_id("cmbc", "old-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_link_refuses_identity_owned_by_another_account() {
        let repo = InMemoryAccountRepository::new();
        repo.create_with_integrate(input("a"), "cmbc", "shared")
            .await
            .unwrap();
        let other = Account::new(input("b"));
        repo.insert_account(other.clone()).await;

        assert!(repo.link_integrate(other.id, "cmbc", "shared").await.is_err());
    }

    #[tokio::test]
    async fn test_activate_and_last_login() {
        let repo = InMemoryAccountRepository::new();
        let mut pending = Account::new(input("p"));
        pending.status = AccountStatus::Pending;
        pending.initialized_at = None;
        repo.insert_account(pending.clone()).await;

        let at = Utc::now();
        let account = repo.activate(pending.id, at).await.unwrap();
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.initialized_at, Some(at));

        repo.update_last_login(pending.id, at, Some("203.0.113.7".into()))
            .await
            .unwrap();
        let stored = repo.get(pending.id).await.unwrap();
        assert_eq!(stored.last_login_at, Some(at));
        assert_eq!(stored.last_login_ip.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn test_missing_account_is_not_found() {
        let repo = InMemoryAccountRepository::new();
        let id = Uuid::now_v7();
        assert!(matches!(
            repo.activate(id, Utc::now()).await,
            Err(AccountError::NotFound(missing)) if missing == id
        ));
    }
}
