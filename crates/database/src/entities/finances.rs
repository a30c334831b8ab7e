use models::status::FinanceType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only ledger row
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "finances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub excess_id: Option<Uuid>,
    pub bank_card_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub finance_type: FinanceType,
    pub description: String,
    pub reference: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id"
    )]
    Booking,
    #[sea_orm(
        belongs_to = "super::excesses::Entity",
        from = "Column::ExcessId",
        to = "super::excesses::Column::Id"
    )]
    Excess,
    #[sea_orm(
        belongs_to = "super::bank_cards::Entity",
        from = "Column::BankCardId",
        to = "super::bank_cards::Column::Id",
        on_delete = "SetNull"
    )]
    BankCard,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::excesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Excess.def()
    }
}

impl Related<super::bank_cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankCard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
