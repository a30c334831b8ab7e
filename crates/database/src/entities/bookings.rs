use models::status::{BookingStatus, RentalType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contract_id: String,
    /// Optional external reference, unique when present
    #[sea_orm(unique)]
    pub booking_reference: Option<String>,
    pub account_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub insurance_amount: Decimal,
    pub rental_days: i32,
    pub rental_type: RentalType,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub daily_rate: Decimal,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub status: BookingStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Account,
    #[sea_orm(has_many = "super::excesses::Entity")]
    Excesses,
    #[sea_orm(has_many = "super::finances::Entity")]
    Finances,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::excesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Excesses.def()
    }
}

impl Related<super::finances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Finances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
