use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only audit entry for an excess
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "excess_actions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub excess_id: Uuid,
    pub account_id: Uuid,
    pub action_type: String,
    pub description: String,
    pub details: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::excesses::Entity",
        from = "Column::ExcessId",
        to = "super::excesses::Column::Id"
    )]
    Excess,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Account,
}

impl Related<super::excesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Excess.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
