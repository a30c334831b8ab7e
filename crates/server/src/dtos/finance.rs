use chrono::{DateTime, Utc};
use database::{
    entities::finances,
    services::{Ledger, LedgerEntry},
};
use models::{ledger::LedgerSummary, status::FinanceType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FinanceQuery {
    #[serde(rename = "type")]
    pub finance_type: Option<FinanceType>,
    /// Another account to read, honoured for admins and employees only
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub excess_id: Option<Uuid>,
    pub bank_card_id: Option<Uuid>,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub finance_type: FinanceType,
    pub description: String,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<finances::Model> for FinanceResponse {
    fn from(finance: finances::Model) -> Self {
        Self {
            id: finance.id,
            account_id: finance.account_id,
            booking_id: finance.booking_id,
            excess_id: finance.excess_id,
            bank_card_id: finance.bank_card_id,
            amount: finance.amount,
            finance_type: finance.finance_type,
            description: finance.description,
            reference: finance.reference,
            created_at: finance.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerBooking {
    pub id: Uuid,
    pub contract_id: String,
    pub customer_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LedgerExcess {
    #[serde(rename = "type")]
    pub excess_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerCard {
    pub id: Uuid,
    pub card_number: String,
    pub card_holder_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryResponse {
    #[serde(flatten)]
    pub finance: FinanceResponse,
    pub booking: Option<LedgerBooking>,
    pub excess: Option<LedgerExcess>,
    pub bank_card: Option<LedgerCard>,
}

impl From<LedgerEntry> for LedgerEntryResponse {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            finance: entry.finance.into(),
            booking: entry.booking.map(|b| LedgerBooking {
                id: b.id,
                contract_id: b.contract_id,
                customer_name: b.customer_name,
            }),
            excess: entry.excess_type.map(|excess_type| LedgerExcess { excess_type }),
            bank_card: entry.bank_card.map(|card| LedgerCard {
                id: card.id,
                card_number: card.masked_number(),
                card_holder_name: card.card_holder_name,
            }),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_credit: Decimal,
    pub total_debit: Decimal,
    /// Same as `totalDebit`
    pub total_expenses: Decimal,
    /// Same as `totalCredit`
    pub total_due: Decimal,
    pub balance: Decimal,
}

impl From<LedgerSummary> for SummaryResponse {
    fn from(summary: LedgerSummary) -> Self {
        Self {
            total_credit: summary.total_credit,
            total_debit: summary.total_debit,
            total_expenses: summary.total_debit,
            total_due: summary.total_credit,
            balance: summary.balance,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResponse {
    pub account_id: Uuid,
    pub finances: Vec<LedgerEntryResponse>,
    pub summary: SummaryResponse,
}

impl From<Ledger> for LedgerResponse {
    fn from(ledger: Ledger) -> Self {
        Self {
            account_id: ledger.account_id,
            finances: ledger.entries.into_iter().map(Into::into).collect(),
            summary: ledger.summary.into(),
        }
    }
}
