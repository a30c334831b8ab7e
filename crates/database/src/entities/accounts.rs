use models::role::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::bank_cards::Entity")]
    BankCards,
    #[sea_orm(has_many = "super::finances::Entity")]
    Finances,
    #[sea_orm(has_many = "super::excess_actions::Entity")]
    ExcessActions,
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::bank_cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankCards.def()
    }
}

impl Related<super::finances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Finances.def()
    }
}

impl Related<super::excess_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExcessActions.def()
    }
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
