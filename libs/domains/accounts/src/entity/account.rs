use crate::models::{AccountStatus, InterfaceLanguage};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub password: Option<String>,
    pub status: AccountStatus,
    pub interface_language: InterfaceLanguage,
    pub initialized_at: Option<DateTimeWithTimeZone>,
    pub last_login_at: Option<DateTimeWithTimeZone>,
    pub last_login_ip: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_integrate::Entity")]
    AccountIntegrate,
}

impl Related<super::account_integrate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountIntegrate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            password: model.password,
            status: model.status,
            interface_language: model.interface_language,
            initialized_at: model.initialized_at.map(Into::into),
            last_login_at: model.last_login_at.map(Into::into),
            last_login_ip: model.last_login_ip,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::models::Account> for ActiveModel {
    fn from(account: crate::models::Account) -> Self {
        ActiveModel {
            id: Set(account.id),
            email: Set(account.email),
            name: Set(account.name),
            password: Set(account.password),
            status: Set(account.status),
            interface_language: Set(account.interface_language),
            initialized_at: Set(account.initialized_at.map(Into::into)),
            last_login_at: Set(account.last_login_at.map(Into::into)),
            last_login_ip: Set(account.last_login_ip),
            created_at: Set(account.created_at.into()),
            updated_at: Set(account.updated_at.into()),
        }
    }
}
