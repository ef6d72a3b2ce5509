use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{account, account_integrate},
    error::{AccountError, AccountResult},
    models::{Account, AccountIntegrate, AccountStatus, CreateAccount},
    repository::AccountRepository,
};

pub struct PgAccountRepository {
    db: DatabaseConnection,
}

impl PgAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn not_found_on_missing_row(id: Uuid) -> impl FnOnce(DbErr) -> AccountError {
    move |e| match e {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => AccountError::NotFound(id),
        other => AccountError::Database(other),
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_open_id(
        &self,
        provider: &str,
        open_id: &str,
    ) -> AccountResult<Option<Account>> {
        let found = account_integrate::Entity::find()
            .filter(account_integrate::Column::Provider.eq(provider))
            .filter(account_integrate::Column::OpenId.eq(open_id))
            .find_also_related(account::Entity)
            .one(&self.db)
            .await?;

        Ok(found.and_then(|(_, account)| account).map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> AccountResult<Option<Account>> {
        let model = account::Entity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn create_with_integrate(
        &self,
        input: CreateAccount,
        provider: &str,
        open_id: &str,
    ) -> AccountResult<Account> {
        let account = Account::new(input);
        let link = AccountIntegrate::new(account.id, provider, open_id);

        let txn = self.db.begin().await?;
        let model = account::ActiveModel::from(account).insert(&txn).await?;
        account_integrate::ActiveModel::from(link)
            .insert(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(account_id = %model.id, provider, "Created account");
        Ok(model.into())
    }

    async fn link_integrate(
        &self,
        account_id: Uuid,
        provider: &str,
        open_id: &str,
    ) -> AccountResult<AccountIntegrate> {
        let link = AccountIntegrate::new(account_id, provider, open_id);

        let model = account_integrate::Entity::insert(account_integrate::ActiveModel::from(link))
            .on_conflict(
                OnConflict::columns([
                    account_integrate::Column::AccountId,
                    account_integrate::Column::Provider,
                ])
                .update_columns([
                    account_integrate::Column::OpenId,
                    account_integrate::Column::EncryptedToken,
                    account_integrate::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        tracing::debug!(account_id = %account_id, provider, "Linked account");
        Ok(model.into())
    }

    async fn activate(&self, id: Uuid, at: DateTime<Utc>) -> AccountResult<Account> {
        let model = account::ActiveModel {
            id: Unchanged(id),
            status: Set(AccountStatus::Active),
            initialized_at: Set(Some(at.into())),
            updated_at: Set(at.into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(not_found_on_missing_row(id))?;

        tracing::info!(account_id = %id, "Activated account");
        Ok(model.into())
    }

    async fn update_last_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        ip: Option<String>,
    ) -> AccountResult<()> {
        account::ActiveModel {
            id: Unchanged(id),
            last_login_at: Set(Some(at.into())),
            last_login_ip: Set(ip),
            updated_at: Set(at.into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(not_found_on_missing_row(id))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InterfaceLanguage;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn account_model(email: &str, status: AccountStatus) -> account::Model {
        let now = Utc::now().into();
        account::Model {
            id: Uuid::now_v7(),
            email: email.to_string(),
            name: email.to_string(),
            password: None,
            status,
            interface_language: InterfaceLanguage::EnUs,
            initialized_at: None,
            last_login_at: None,
            last_login_ip: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn integrate_model(account_id: Uuid) -> account_integrate::Model {
        let now = Utc::now().into();
        account_integrate::Model {
            id: Uuid::now_v7(),
            account_id,
            provider: "cmbc".to_string(),
            open_id: "u1".to_string(),
            encrypted_token: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_find_by_email_maps_model() {
        let model = account_model("u1", AccountStatus::Pending);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[model.clone()]])
            .into_connection();

        let repo = PgAccountRepository::new(db);
        let account = repo.find_by_email("u1").await.unwrap().unwrap();

        assert_eq!(account.id, model.id);
        assert_eq!(account.status, AccountStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_with_integrate_returns_inserted_account() {
        let model = account_model("u1", AccountStatus::Active);
        let link = integrate_model(model.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[model.clone()]])
            .append_query_results([[link]])
            .into_connection();

        let repo = PgAccountRepository::new(db);
        let input = CreateAccount {
            email: "u1".into(),
            name: "u1".into(),
            status: AccountStatus::Active,
            interface_language: InterfaceLanguage::EnUs,
            initialized_at: Some(Utc::now()),
        };
        let account = repo.create_with_integrate(input, "cmbc", "u1").await.unwrap();
        assert_eq!(account.email, "u1");
        assert_eq!(account.id, model.id);
    }

    #[tokio::test]
    async fn test_update_last_login_on_missing_account_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<account::Model>::new()])
            .into_connection();

        let repo = PgAccountRepository::new(db);
        let id = Uuid::now_v7();
        let err = repo
            .update_last_login(id, Utc::now(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::NotFound(missing) if missing == id));
    }
}
