use chrono::Utc;
use std::sync::Arc;
use strum::Display;
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};
use crate::models::{Account, AccountStatus, CreateAccount, InterfaceLanguage};
use crate::oauth::OAuthUserInfo;
use crate::repository::AccountRepository;

/// How a provider identity was matched to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ResolutionSource {
    /// An existing link for the identity
    Linked,
    /// No link, but an account whose email equals the identity's
    Email,
    /// Nothing matched; the account was registered
    Created,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAccount {
    pub account: Account,
    pub source: ResolutionSource,
}

/// Resolves provider identities to accounts and gates logins on status.
pub struct AccountLinkingService<R: AccountRepository> {
    repository: Arc<R>,
}

impl<R: AccountRepository> Clone for AccountLinkingService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: AccountRepository> AccountLinkingService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Find the account for an identity: by link, then by email, else
    /// register one (with its link) using `language` as its UI language.
    pub async fn resolve_account(
        &self,
        provider: &str,
        user_info: &OAuthUserInfo,
        language: InterfaceLanguage,
    ) -> AccountResult<ResolvedAccount> {
        if let Some(account) = self
            .repository
            .find_by_open_id(provider, &user_info.id)
            .await?
        {
            return Ok(ResolvedAccount {
                account,
                source: ResolutionSource::Linked,
            });
        }

        if let Some(account) = self.repository.find_by_email(&user_info.email).await? {
            tracing::info!(
                account_id = %account.id,
                provider,
                "Matched provider identity to existing account by email"
            );
            return Ok(ResolvedAccount {
                account,
                source: ResolutionSource::Email,
            });
        }

        let input = CreateAccount::from_oauth(user_info, language, Utc::now());
        let account = self
            .repository
            .create_with_integrate(input, provider, &user_info.id)
            .await?;

        Ok(ResolvedAccount {
            account,
            source: ResolutionSource::Created,
        })
    }

    /// Point the account's link for `provider` at `open_id`.
    pub async fn link_account(
        &self,
        account_id: Uuid,
        provider: &str,
        open_id: &str,
    ) -> AccountResult<()> {
        self.repository
            .link_integrate(account_id, provider, open_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    account_id = %account_id,
                    provider,
                    error = %e,
                    "Failed to link account"
                );
                AccountError::LinkFailed(e.to_string())
            })?;
        Ok(())
    }

    /// Reject banned/closed accounts; activate pending ones.
    pub async fn enforce_status(&self, account: Account) -> AccountResult<Account> {
        if account.status.is_locked() {
            return Err(AccountError::AccountBannedOrClosed);
        }
        match account.status {
            AccountStatus::Pending => self.repository.activate(account.id, Utc::now()).await,
            _ => Ok(account),
        }
    }

    /// Resolve, link if needed, and gate. The returned account may log in.
    pub async fn authenticate(
        &self,
        provider: &str,
        user_info: &OAuthUserInfo,
        language: InterfaceLanguage,
    ) -> AccountResult<ResolvedAccount> {
        let ResolvedAccount { account, source } =
            self.resolve_account(provider, user_info, language).await?;

        // Created accounts get their link in the same transaction
        if source == ResolutionSource::Email {
            self.link_account(account.id, provider, &user_info.id)
                .await?;
        }

        let account = self.enforce_status(account).await?;
        Ok(ResolvedAccount { account, source })
    }

    pub async fn record_login(&self, account_id: Uuid, ip: Option<String>) -> AccountResult<()> {
        self.repository
            .update_last_login(account_id, Utc::now(), ip)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountIntegrate;
    use crate::repository::MockAccountRepository;
    use mockall::predicate::eq;
    use sea_orm::DbErr;

    fn account(status: AccountStatus) -> Account {
        let mut account = Account::new(CreateAccount {
            email: "u1".into(),
            name: "u1".into(),
            status,
            interface_language: InterfaceLanguage::EnUs,
            initialized_at: None,
        });
        if status == AccountStatus::Active {
            account.initialized_at = Some(Utc::now());
        }
        account
    }

    fn info() -> OAuthUserInfo {
        OAuthUserInfo::from_external_id("u1")
    }

    #[tokio::test]
    async fn test_linked_identity_is_reused() {
        let existing = account(AccountStatus::Active);
        let returned = existing.clone();

        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_open_id()
            .with(eq("cmbc"), eq("u1"))
            .times(1)
            .returning(move |_, _| Ok(Some(returned.clone())));
        repo.expect_find_by_email().never();
        repo.expect_create_with_integrate().never();
        repo.expect_link_integrate().never();

        let service = AccountLinkingService::new(repo);
        let resolved = service
            .authenticate("cmbc", &info(), InterfaceLanguage::EnUs)
            .await
            .unwrap();

        assert_eq!(resolved.source, ResolutionSource::Linked);
        assert_eq!(resolved.account.id, existing.id);
    }

    #[tokio::test]
    async fn test_email_match_adds_link() {
        let existing = account(AccountStatus::Active);
        let account_id = existing.id;
        let returned = existing.clone();

        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_open_id().returning(|_, _| Ok(None));
        repo.expect_find_by_email()
            .with(eq("u1"))
            .returning(move |_| Ok(Some(returned.clone())));
        repo.expect_create_with_integrate().never();
        repo.expect_link_integrate()
            .with(eq(account_id), eq("cmbc"), eq("u1"))
            .times(1)
            .returning(|id, provider, open_id| Ok(AccountIntegrate::new(id, provider, open_id)));

        let service = AccountLinkingService::new(repo);
        let resolved = service
            .authenticate("cmbc", &info(), InterfaceLanguage::EnUs)
            .await
            .unwrap();

        assert_eq!(resolved.source, ResolutionSource::Email);
        assert_eq!(resolved.account.id, account_id);
    }

    #[tokio::test]
    async fn test_unknown_identity_registers_account() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_open_id().returning(|_, _| Ok(None));
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create_with_integrate()
            .withf(|input, provider, open_id| {
                input.email == "u1"
                    && input.name == "u1"
                    && input.status == AccountStatus::Active
                    && input.initialized_at.is_some()
                    && input.interface_language == InterfaceLanguage::ZhHans
                    && provider == "cmbc"
                    && open_id == "u1"
            })
            .times(1)
            .returning(|input, _, _| Ok(Account::new(input)));
        repo.expect_link_integrate().never();

        let service = AccountLinkingService::new(repo);
        let resolved = service
            .authenticate("cmbc", &info(), InterfaceLanguage::ZhHans)
            .await
            .unwrap();

        assert_eq!(resolved.source, ResolutionSource::Created);
        assert_eq!(resolved.account.interface_language, InterfaceLanguage::ZhHans);
    }

    #[tokio::test]
    async fn test_pending_account_is_activated() {
        let pending = account(AccountStatus::Pending);
        let id = pending.id;

        let mut repo = MockAccountRepository::new();
        repo.expect_activate()
            .withf(move |account_id, _| *account_id == id)
            .times(1)
            .returning(move |_, at| {
                let mut activated = account(AccountStatus::Pending);
                activated.id = id;
                activated.status = AccountStatus::Active;
                activated.initialized_at = Some(at);
                Ok(activated)
            });

        let service = AccountLinkingService::new(repo);
        let account = service.enforce_status(pending).await.unwrap();

        assert_eq!(account.status, AccountStatus::Active);
        assert!(account.initialized_at.is_some());
    }

    #[tokio::test]
    async fn test_active_account_is_untouched() {
        let active = account(AccountStatus::Active);
        let mut repo = MockAccountRepository::new();
        repo.expect_activate().never();

        let service = AccountLinkingService::new(repo);
        let account = service.enforce_status(active.clone()).await.unwrap();
        assert_eq!(account, active);
    }

    #[tokio::test]
    async fn test_banned_and_closed_are_rejected() {
        for status in [AccountStatus::Banned, AccountStatus::Closed] {
            let mut repo = MockAccountRepository::new();
            repo.expect_activate().never();

            let service = AccountLinkingService::new(repo);
            let err = service.enforce_status(account(status)).await.unwrap_err();
            assert!(matches!(err, AccountError::AccountBannedOrClosed));
        }
    }

    #[tokio::test]
    async fn test_link_failure_is_reported_as_link_failed() {
        let mut repo = MockAccountRepository::new();
        repo.expect_link_integrate()
            .returning(|_, _, _| Err(AccountError::Database(DbErr::Custom("unique".into()))));

        let service = AccountLinkingService::new(repo);
        let err = service
            .link_account(Uuid::now_v7(), "cmbc", "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::LinkFailed(_)));
    }

    #[tokio::test]
    async fn test_storage_failure_during_lookup_propagates() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_open_id()
            .returning(|_, _| Err(AccountError::Database(DbErr::Custom("connection reset".into()))));
        repo.expect_find_by_email().never();
        repo.expect_create_with_integrate().never();

        let service = AccountLinkingService::new(repo);
        let err = service
            .authenticate("cmbc", &info(), InterfaceLanguage::EnUs)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Database(_)));
    }

    #[tokio::test]
    async fn test_record_login_passes_ip() {
        let id = Uuid::now_v7();
        let mut repo = MockAccountRepository::new();
        repo.expect_update_last_login()
            .withf(move |account_id, _, ip| {
                *account_id == id && ip.as_deref() == Some("198.51.100.4")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = AccountLinkingService::new(repo);
        service
            .record_login(id, Some("198.51.100.4".into()))
            .await
            .unwrap();
    }
}
