use super::{booking::OwnerSummary, finance::FinanceResponse, not_blank, positive};
use chrono::{DateTime, Utc};
use database::{
    entities::{accounts, bookings, excess_actions, excesses},
    services::{ExcessChanges, ExcessDetails, ExcessListItem, NewExcess, StatusChange},
};
use models::{document::DocumentSlot, status::ExcessStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExcessRequest {
    pub booking_id: Uuid,
    #[serde(rename = "type")]
    #[validate(custom(function = "not_blank"))]
    pub excess_type: String,
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    pub description: Option<String>,
    pub notes: Option<String>,
}

impl From<CreateExcessRequest> for NewExcess {
    fn from(req: CreateExcessRequest) -> Self {
        Self {
            booking_id: req.booking_id,
            excess_type: req.excess_type.trim().to_string(),
            amount: req.amount,
            description: req.description,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateExcessRequest {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl From<UpdateExcessRequest> for ExcessChanges {
    fn from(req: UpdateExcessRequest) -> Self {
        Self {
            notes: req.notes,
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeStatusRequest {
    /// `NEED_UPDATE`, `APPROVED` or `DECLINED` (`REFUSED` is accepted as `DECLINED`)
    #[validate(custom(function = "not_blank"))]
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDocumentRequest {
    /// Field name (`imageInvoice`) or short name (`invoice`)
    #[validate(custom(function = "not_blank"))]
    pub document_type: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExcessQuery {
    #[serde(rename = "bookingId")]
    pub booking_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DownloadQuery {
    /// `identity`, `contract`, `license`, `invoice` or `subscription`
    #[serde(rename = "type")]
    pub document_type: String,
}

/// Booking fields shown next to an excess
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: Uuid,
    pub contract_id: String,
    pub booking_reference: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<OwnerSummary>,
}

impl BookingSummary {
    fn new(booking: bookings::Model, owner: Option<accounts::Model>) -> Self {
        let owner = owner.map(OwnerSummary::from);
        Self {
            id: booking.id,
            contract_id: booking.contract_id,
            booking_reference: booking.booking_reference,
            start_date: booking.start_date,
            end_date: booking.end_date,
            customer_name: owner.as_ref().map(|o| o.name.clone()),
            account: owner,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExcessResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    #[serde(rename = "type")]
    pub excess_type: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub image_identity: Option<String>,
    pub image_contract: Option<String>,
    pub image_license: Option<String>,
    pub image_invoice: Option<String>,
    pub image_company_subscription: Option<String>,
    pub status: ExcessStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingSummary>,
}

impl From<excesses::Model> for ExcessResponse {
    fn from(excess: excesses::Model) -> Self {
        Self {
            id: excess.id,
            booking_id: excess.booking_id,
            excess_type: excess.excess_type,
            amount: excess.amount,
            description: excess.description,
            notes: excess.notes,
            image_identity: excess.image_identity,
            image_contract: excess.image_contract,
            image_license: excess.image_license,
            image_invoice: excess.image_invoice,
            image_company_subscription: excess.image_company_subscription,
            status: excess.status,
            created_at: excess.created_at,
            updated_at: excess.updated_at,
            booking: None,
        }
    }
}

impl From<ExcessListItem> for ExcessResponse {
    fn from(item: ExcessListItem) -> Self {
        Self {
            booking: Some(BookingSummary::new(item.booking, item.owner)),
            ..item.excess.into()
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// Multipart field name of the slot
    #[serde(rename = "type")]
    pub slot: String,
    pub short_name: String,
    pub label: String,
    pub reference: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActorSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub id: Uuid,
    pub action_type: String,
    pub description: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub account: Option<ActorSummary>,
}

impl From<(excess_actions::Model, Option<accounts::Model>)> for ActionResponse {
    fn from((action, actor): (excess_actions::Model, Option<accounts::Model>)) -> Self {
        Self {
            id: action.id,
            action_type: action.action_type,
            description: action.description,
            details: action.details,
            created_at: action.created_at,
            account: actor.map(|a| ActorSummary {
                id: a.id,
                name: a.name,
            }),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExcessDetailsResponse {
    pub excess: ExcessResponse,
    pub booking: BookingSummary,
    pub documents: Vec<DocumentInfo>,
    pub actions: Vec<ActionResponse>,
}

impl From<ExcessDetails> for ExcessDetailsResponse {
    fn from(details: ExcessDetails) -> Self {
        let documents = DocumentSlot::ALL
            .into_iter()
            .map(|slot| DocumentInfo {
                slot: slot.field_name().to_string(),
                short_name: slot.short_name().to_string(),
                label: slot.label().to_string(),
                reference: details.excess.document(slot).map(str::to_string),
            })
            .collect();

        let mut booking = BookingSummary::new(details.booking, None);
        booking.customer_name = details.customer_name;

        Self {
            excess: details.excess.into(),
            booking,
            documents,
            actions: details.actions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeResponse {
    pub excess: ExcessResponse,
    pub previous_status: ExcessStatus,
    /// Ledger credit written by this approval, if any
    pub credit: Option<FinanceResponse>,
}

impl From<StatusChange> for StatusChangeResponse {
    fn from(change: StatusChange) -> Self {
        Self {
            excess: change.excess.into(),
            previous_status: change.previous,
            credit: change.credit.map(Into::into),
        }
    }
}
