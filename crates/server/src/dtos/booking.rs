use super::{excess::ExcessResponse, finance::FinanceResponse, not_blank, positive};
use chrono::{DateTime, Utc};
use database::{
    entities::{accounts, bookings},
    services::{BookingChanges, BookingDetails, NewBooking},
};
use models::status::{BookingStatus, RentalType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(custom(function = "not_blank"))]
    pub contract_id: String,
    pub booking_reference: Option<String>,
    #[validate(custom(function = "positive"))]
    pub insurance_amount: Decimal,
    #[validate(range(min = 1, message = "must be at least one day"))]
    pub rental_days: i32,
    pub rental_type: RentalType,
    #[validate(custom(function = "positive"))]
    pub daily_rate: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<CreateBookingRequest> for NewBooking {
    fn from(req: CreateBookingRequest) -> Self {
        Self {
            contract_id: req.contract_id.trim().to_string(),
            booking_reference: req.booking_reference,
            insurance_amount: req.insurance_amount,
            rental_days: req.rental_days,
            rental_type: req.rental_type,
            daily_rate: req.daily_rate,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[validate(custom(function = "not_blank"))]
    pub contract_id: Option<String>,
    pub booking_reference: Option<String>,
    #[validate(custom(function = "positive"))]
    pub insurance_amount: Option<Decimal>,
    #[validate(range(min = 1, message = "must be at least one day"))]
    pub rental_days: Option<i32>,
    pub rental_type: Option<RentalType>,
    #[validate(custom(function = "positive"))]
    pub daily_rate: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
}

impl From<UpdateBookingRequest> for BookingChanges {
    fn from(req: UpdateBookingRequest) -> Self {
        Self {
            contract_id: req.contract_id,
            booking_reference: req.booking_reference,
            insurance_amount: req.insurance_amount,
            rental_days: req.rental_days,
            rental_type: req.rental_type,
            daily_rate: req.daily_rate,
            start_date: req.start_date,
            end_date: req.end_date,
            status: req.status,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    /// Another account to read, honoured for admins and employees only
    pub user_id: Option<Uuid>,
}

/// Name and email of the account owning a record
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<accounts::Model> for OwnerSummary {
    fn from(account: accounts::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub contract_id: String,
    pub booking_reference: Option<String>,
    pub account_id: Uuid,
    pub insurance_amount: Decimal,
    pub rental_days: i32,
    pub rental_type: RentalType,
    pub daily_rate: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<OwnerSummary>,
}

impl From<bookings::Model> for BookingResponse {
    fn from(booking: bookings::Model) -> Self {
        Self {
            id: booking.id,
            contract_id: booking.contract_id,
            booking_reference: booking.booking_reference,
            account_id: booking.account_id,
            insurance_amount: booking.insurance_amount,
            rental_days: booking.rental_days,
            rental_type: booking.rental_type,
            daily_rate: booking.daily_rate,
            start_date: booking.start_date,
            end_date: booking.end_date,
            status: booking.status,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
            customer_name: None,
            account: None,
        }
    }
}

impl BookingResponse {
    /// Adds the owner's name, as shown in booking lists
    pub fn with_customer(booking: bookings::Model, owner: Option<accounts::Model>) -> Self {
        Self {
            customer_name: owner.map(|o| o.name),
            ..booking.into()
        }
    }

    /// Adds the full owner summary, as shown in the back office
    pub fn with_owner(booking: bookings::Model, owner: Option<accounts::Model>) -> Self {
        let owner = owner.map(OwnerSummary::from);
        Self {
            customer_name: owner.as_ref().map(|o| o.name.clone()),
            account: owner,
            ..booking.into()
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailsResponse {
    #[serde(flatten)]
    pub booking: BookingResponse,
    pub excesses: Vec<ExcessResponse>,
    pub finances: Vec<FinanceResponse>,
}

impl From<BookingDetails> for BookingDetailsResponse {
    fn from(details: BookingDetails) -> Self {
        Self {
            booking: details.booking.into(),
            excesses: details.excesses.into_iter().map(Into::into).collect(),
            finances: details.finances.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExcessCountResponse {
    pub count: u64,
}
