use chrono::{DateTime, Utc};
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::oauth::OAuthUserInfo;

/// Account lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccountStatus {
    /// Registered but never logged in
    #[sea_orm(string_value = "pending")]
    Pending,
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "banned")]
    Banned,
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl AccountStatus {
    /// Banned and closed accounts may not log in
    pub fn is_locked(&self) -> bool {
        matches!(self, AccountStatus::Banned | AccountStatus::Closed)
    }
}

/// Console UI language
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum InterfaceLanguage {
    #[serde(rename = "zh-Hans")]
    #[strum(serialize = "zh-Hans")]
    #[sea_orm(string_value = "zh-Hans")]
    ZhHans,
    #[default]
    #[serde(rename = "en-US")]
    #[strum(serialize = "en-US")]
    #[sea_orm(string_value = "en-US")]
    EnUs,
}

/// A console account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Never set for accounts that only sign in through a provider
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub status: AccountStatus,
    pub interface_language: InterfaceLanguage,
    pub initialized_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub last_login_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(input: CreateAccount) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email: input.email,
            name: input.name,
            password: None,
            status: input.status,
            interface_language: input.interface_language,
            initialized_at: input.initialized_at,
            last_login_at: None,
            last_login_ip: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Link between an account and an identity at an external provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AccountIntegrate {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Provider key, e.g. "cmbc"
    pub provider: String,
    /// User id at the provider
    pub open_id: String,
    /// Empty for providers that hand out no token
    #[serde(skip_serializing)]
    pub encrypted_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountIntegrate {
    pub fn new(account_id: Uuid, provider: &str, open_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            account_id,
            provider: provider.to_string(),
            open_id: open_id.to_string(),
            encrypted_token: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for registering an account
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAccount {
    pub email: String,
    pub name: String,
    pub status: AccountStatus,
    pub interface_language: InterfaceLanguage,
    pub initialized_at: Option<DateTime<Utc>>,
}

impl CreateAccount {
    /// Registration from a provider login: active immediately, no password.
    pub fn from_oauth(
        user_info: &OAuthUserInfo,
        interface_language: InterfaceLanguage,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            email: user_info.email.clone(),
            name: user_info.name.clone(),
            status: AccountStatus::Active,
            interface_language,
            initialized_at: Some(now),
        }
    }
}
