use crate::ParseEnumError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Lifecycle of a booking
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "CONFIRMED")]
    Confirmed,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "CONFIRMED" => Ok(Self::Confirmed),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError::new("booking status", s)),
        }
    }
}

/// Review state of an excess claim.
///
/// Any status may move to any other; there is no terminal state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExcessStatus {
    /// Waiting on the customer (documents missing or changed)
    #[sea_orm(string_value = "NEED_UPDATE")]
    NeedUpdate,
    /// Accepted by an admin, the claim amount is credited to the booking owner
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Refused by an admin
    #[sea_orm(string_value = "DECLINED")]
    Declined,
}

impl ExcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedUpdate => "NEED_UPDATE",
            Self::Approved => "APPROVED",
            Self::Declined => "DECLINED",
        }
    }

    /// Approving and declining are admin decisions
    pub fn is_decision(&self) -> bool {
        matches!(self, Self::Approved | Self::Declined)
    }
}

impl FromStr for ExcessStatus {
    type Err = ParseEnumError;

    /// Parses a requested status. `REFUSED` is accepted as a synonym of `DECLINED`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEED_UPDATE" => Ok(Self::NeedUpdate),
            "APPROVED" => Ok(Self::Approved),
            "DECLINED" | "REFUSED" => Ok(Self::Declined),
            _ => Err(ParseEnumError::new("excess status", s)),
        }
    }
}

/// Direction of a ledger row
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinanceType {
    #[sea_orm(string_value = "CREDIT")]
    Credit,
    #[sea_orm(string_value = "DEBIT")]
    Debit,
}

impl FinanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
        }
    }
}

impl FromStr for FinanceType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREDIT" => Ok(Self::Credit),
            "DEBIT" => Ok(Self::Debit),
            _ => Err(ParseEnumError::new("finance type", s)),
        }
    }
}

/// Billing period of a rental contract
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum RentalType {
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refused_is_declined() {
        assert_eq!("REFUSED".parse::<ExcessStatus>(), Ok(ExcessStatus::Declined));
        assert_eq!("DECLINED".parse::<ExcessStatus>(), Ok(ExcessStatus::Declined));
    }

    #[test]
    fn test_unknown_excess_status_is_rejected() {
        let err = "PENDING".parse::<ExcessStatus>().unwrap_err();
        assert_eq!(err.kind, "excess status");
        assert!("approved".parse::<ExcessStatus>().is_err());
        assert!("".parse::<ExcessStatus>().is_err());
    }

    #[test]
    fn test_decisions() {
        assert!(ExcessStatus::Approved.is_decision());
        assert!(ExcessStatus::Declined.is_decision());
        assert!(!ExcessStatus::NeedUpdate.is_decision());
    }

    #[test]
    fn test_serde_names_match_column_values() {
        let json = serde_json::to_string(&ExcessStatus::NeedUpdate).unwrap();
        assert_eq!(json, "\"NEED_UPDATE\"");

        let json = serde_json::to_string(&BookingStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");

        let rental: RentalType = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(rental, RentalType::Weekly);
    }

    #[test]
    fn test_finance_type_parse() {
        assert_eq!("CREDIT".parse::<FinanceType>(), Ok(FinanceType::Credit));
        assert_eq!(FinanceType::Debit.as_str(), "DEBIT");
        assert!("credit".parse::<FinanceType>().is_err());
    }
}
