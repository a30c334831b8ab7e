use super::{finance::FinanceResponse, not_blank, positive, storable};
use chrono::{DateTime, Utc};
use database::{
    entities::bank_cards,
    services::{BankCardChanges, CardMovement, NewBankCard},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn card_number(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| !c.is_whitespace()).count();
    if (13..=19).contains(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("card_number").with_message("must be 13 to 19 characters".into()))
    }
}

/// `MM/YY` with a month between 01 and 12
fn expiry_date(value: &str) -> Result<(), ValidationError> {
    let valid = match value.split_once('/') {
        Some((month, year)) => {
            month.len() == 2
                && year.len() == 2
                && year.chars().all(|c| c.is_ascii_digit())
                && month.parse::<u8>().is_ok_and(|m| (1..=12).contains(&m))
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("expiry_date").with_message("must be formatted as MM/YY".into()))
    }
}

fn not_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(ValidationError::new("not_negative").with_message("cannot be negative".into()))
    } else {
        storable(value)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankCardRequest {
    /// Owner of the card, admins only
    pub account_id: Option<Uuid>,
    #[validate(custom(function = "card_number"))]
    pub card_number: String,
    #[validate(length(min = 2, max = 100))]
    pub card_holder_name: String,
    #[validate(custom(function = "expiry_date"))]
    pub expiry_date: String,
    #[validate(length(min = 3, max = 4))]
    pub cvv: Option<String>,
    #[validate(custom(function = "not_negative"))]
    pub balance: Option<Decimal>,
}

impl From<CreateBankCardRequest> for NewBankCard {
    fn from(req: CreateBankCardRequest) -> Self {
        Self {
            account_id: req.account_id,
            card_number: req.card_number,
            card_holder_name: req.card_holder_name,
            expiry_date: req.expiry_date,
            cvv: req.cvv,
            balance: req.balance,
        }
    }
}

/// Card details only. Balances move through deposits and withdrawals.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBankCardRequest {
    #[validate(custom(function = "self::card_number"))]
    pub card_number: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub card_holder_name: Option<String>,
    #[validate(custom(function = "self::expiry_date"))]
    pub expiry_date: Option<String>,
    #[validate(length(min = 3, max = 4))]
    pub cvv: Option<String>,
}

impl From<UpdateBankCardRequest> for BankCardChanges {
    fn from(req: UpdateBankCardRequest) -> Self {
        Self {
            card_number: req.card_number,
            card_holder_name: req.card_holder_name,
            expiry_date: req.expiry_date,
            cvv: req.cvv,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MoveFundsRequest {
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankCardResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub card_number: String,
    pub masked_number: String,
    pub card_holder_name: String,
    pub expiry_date: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<bank_cards::Model> for BankCardResponse {
    fn from(card: bank_cards::Model) -> Self {
        Self {
            masked_number: card.masked_number(),
            id: card.id,
            account_id: card.account_id,
            card_number: card.card_number,
            card_holder_name: card.card_holder_name,
            expiry_date: card.expiry_date,
            balance: card.balance,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardMovementResponse {
    pub bank_card: BankCardResponse,
    pub finance: FinanceResponse,
}

impl From<CardMovement> for CardMovementResponse {
    fn from(movement: CardMovement) -> Self {
        Self {
            bank_card: movement.bank_card.into(),
            finance: movement.finance.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expiry_date_format() {
        assert!(expiry_date("01/29").is_ok());
        assert!(expiry_date("12/30").is_ok());
        assert!(expiry_date("13/29").is_err());
        assert!(expiry_date("00/29").is_err());
        assert!(expiry_date("1/29").is_err());
        assert!(expiry_date("0129").is_err());
    }

    #[test]
    fn test_card_number_length() {
        assert!(card_number("4111 1111 1111 1111").is_ok());
        assert!(card_number("411111111111").is_err());
    }

    #[test]
    fn test_initial_balance() {
        assert!(not_negative(&dec!(0)).is_ok());
        assert!(not_negative(&dec!(120.5)).is_ok());
        assert!(not_negative(&dec!(-1)).is_err());
        assert!(not_negative(&dec!(10.12345)).is_err());
        assert!(not_negative(&dec!(1000000000000)).is_err());
    }
}
