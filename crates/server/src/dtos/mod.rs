pub mod auth;
pub mod bank_card;
pub mod booking;
pub mod excess;
pub mod finance;
pub mod notification;
pub mod user;

use models::ledger::{AMOUNT_LIMIT, AMOUNT_SCALE, fits_storage};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationError;

/// Plain acknowledgement for endpoints with nothing else to return
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub(crate) fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_positive() && !value.is_zero() {
        storable(value)
    } else {
        Err(ValidationError::new("positive").with_message("must be greater than zero".into()))
    }
}

/// Amounts are stored as `DECIMAL(16, 4)` and must not be rounded on the way in
pub(crate) fn storable(value: &Decimal) -> Result<(), ValidationError> {
    if fits_storage(*value) {
        Ok(())
    } else {
        Err(ValidationError::new("amount_range").with_message(
            format!("must be below {AMOUNT_LIMIT} with at most {AMOUNT_SCALE} decimal places")
                .into(),
        ))
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("not_blank").with_message("must not be blank".into()))
    } else {
        Ok(())
    }
}
