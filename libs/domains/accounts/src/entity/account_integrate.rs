use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "account_integrates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub provider: String,
    pub open_id: String,
    #[sea_orm(column_type = "Text")]
    pub encrypted_token: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::AccountIntegrate {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            account_id: model.account_id,
            provider: model.provider,
            open_id: model.open_id,
            encrypted_token: model.encrypted_token,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::models::AccountIntegrate> for ActiveModel {
    fn from(link: crate::models::AccountIntegrate) -> Self {
        ActiveModel {
            id: Set(link.id),
            account_id: Set(link.account_id),
            provider: Set(link.provider),
            open_id: Set(link.open_id),
            encrypted_token: Set(link.encrypted_token),
            created_at: Set(link.created_at.into()),
            updated_at: Set(link.updated_at.into()),
        }
    }
}
