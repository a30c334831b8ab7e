use models::{document::DocumentSlot, status::ExcessStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "excesses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_id: Uuid,
    pub excess_type: String,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub image_identity: Option<String>,
    pub image_contract: Option<String>,
    pub image_license: Option<String>,
    pub image_invoice: Option<String>,
    pub image_company_subscription: Option<String>,
    pub status: ExcessStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Stored reference for one of the document slots
    pub fn document(&self, slot: DocumentSlot) -> Option<&str> {
        match slot {
            DocumentSlot::Identity => self.image_identity.as_deref(),
            DocumentSlot::Contract => self.image_contract.as_deref(),
            DocumentSlot::License => self.image_license.as_deref(),
            DocumentSlot::Invoice => self.image_invoice.as_deref(),
            DocumentSlot::Subscription => self.image_company_subscription.as_deref(),
        }
    }

    /// Every stored document reference
    pub fn documents(&self) -> impl Iterator<Item = (DocumentSlot, &str)> {
        DocumentSlot::ALL
            .into_iter()
            .filter_map(|slot| self.document(slot).map(|name| (slot, name)))
    }
}

/// Column holding the reference for a document slot
pub fn document_column(slot: DocumentSlot) -> Column {
    match slot {
        DocumentSlot::Identity => Column::ImageIdentity,
        DocumentSlot::Contract => Column::ImageContract,
        DocumentSlot::License => Column::ImageLicense,
        DocumentSlot::Invoice => Column::ImageInvoice,
        DocumentSlot::Subscription => Column::ImageCompanySubscription,
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id"
    )]
    Booking,
    #[sea_orm(has_many = "super::excess_actions::Entity")]
    ExcessActions,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::excess_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExcessActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
