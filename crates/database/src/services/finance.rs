use super::ServiceResult;
use crate::entities::{accounts, bank_cards, bookings, excesses, finances};
use chrono::Utc;
use models::{ledger::LedgerSummary, policy::AuthContext, status::FinanceType};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;
use uuid::Uuid;

/// A ledger row about to be appended
#[derive(Debug, Clone)]
pub struct NewFinance {
    pub account_id: Uuid,
    pub finance_type: FinanceType,
    pub amount: Decimal,
    pub description: String,
    pub reference: Option<String>,
    pub booking_id: Option<Uuid>,
    pub excess_id: Option<Uuid>,
    pub bank_card_id: Option<Uuid>,
}

impl NewFinance {
    pub fn new(
        account_id: Uuid,
        finance_type: FinanceType,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            finance_type,
            amount,
            description: description.into(),
            reference: None,
            booking_id: None,
            excess_id: None,
            bank_card_id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingRef {
    pub id: Uuid,
    pub contract_id: String,
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub finance: finances::Model,
    pub booking: Option<BookingRef>,
    pub excess_type: Option<String>,
    pub bank_card: Option<bank_cards::Model>,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    pub account_id: Uuid,
    pub entries: Vec<LedgerEntry>,
    /// Always computed over every row of the account, whatever the filter
    pub summary: LedgerSummary,
}

pub struct FinanceService;

impl FinanceService {
    /// Appends one row to the ledger
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        new: NewFinance,
    ) -> Result<finances::Model, DbErr> {
        finances::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(new.account_id),
            booking_id: Set(new.booking_id),
            excess_id: Set(new.excess_id),
            bank_card_id: Set(new.bank_card_id),
            amount: Set(new.amount),
            finance_type: Set(new.finance_type),
            description: Set(new.description),
            reference: Set(new.reference),
            created_at: Set(Utc::now()),
        }
        .insert(conn)
        .await
    }

    /// Derived totals for an account
    pub async fn summary<C: ConnectionTrait>(
        conn: &C,
        account_id: Uuid,
    ) -> Result<LedgerSummary, DbErr> {
        let rows: Vec<(FinanceType, Decimal)> = finances::Entity::find()
            .select_only()
            .column(finances::Column::FinanceType)
            .column(finances::Column::Amount)
            .filter(finances::Column::AccountId.eq(account_id))
            .into_tuple()
            .all(conn)
            .await?;

        Ok(LedgerSummary::from_entries(rows))
    }

    /// Ledger of the caller, or of `requested` when the caller is staff
    pub async fn ledger(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        requested: Option<Uuid>,
        finance_type: Option<FinanceType>,
    ) -> ServiceResult<Ledger> {
        let account_id = ctx.scoped_account(requested);

        let mut query = finances::Entity::find()
            .filter(finances::Column::AccountId.eq(account_id))
            .order_by_desc(finances::Column::CreatedAt);

        if let Some(finance_type) = finance_type {
            query = query.filter(finances::Column::FinanceType.eq(finance_type));
        }

        let rows = query.all(db).await?;
        let summary = Self::summary(db, account_id).await?;
        let entries = Self::enrich(db, rows).await?;

        Ok(Ledger {
            account_id,
            entries,
            summary,
        })
    }

    /// Rows linked to a booking, including credits for its excesses
    pub async fn for_booking<C: ConnectionTrait>(
        conn: &C,
        booking_id: Uuid,
    ) -> Result<Vec<finances::Model>, DbErr> {
        finances::Entity::find()
            .filter(finances::Column::BookingId.eq(booking_id))
            .order_by_desc(finances::Column::CreatedAt)
            .all(conn)
            .await
    }

    /// Attaches booking, excess and card summaries to ledger rows
    async fn enrich(
        db: &DatabaseConnection,
        rows: Vec<finances::Model>,
    ) -> Result<Vec<LedgerEntry>, DbErr> {
        let booking_ids: Vec<Uuid> = rows.iter().filter_map(|f| f.booking_id).collect();
        let excess_ids: Vec<Uuid> = rows.iter().filter_map(|f| f.excess_id).collect();
        let card_ids: Vec<Uuid> = rows.iter().filter_map(|f| f.bank_card_id).collect();

        let bookings: HashMap<Uuid, BookingRef> = if booking_ids.is_empty() {
            HashMap::new()
        } else {
            bookings::Entity::find()
                .filter(bookings::Column::Id.is_in(booking_ids))
                .find_also_related(accounts::Entity)
                .all(db)
                .await?
                .into_iter()
                .map(|(booking, owner)| {
                    (
                        booking.id,
                        BookingRef {
                            id: booking.id,
                            contract_id: booking.contract_id,
                            customer_name: owner.map(|o| o.name),
                        },
                    )
                })
                .collect()
        };

        let excess_types: HashMap<Uuid, String> = if excess_ids.is_empty() {
            HashMap::new()
        } else {
            excesses::Entity::find()
                .select_only()
                .column(excesses::Column::Id)
                .column(excesses::Column::ExcessType)
                .filter(excesses::Column::Id.is_in(excess_ids))
                .into_tuple::<(Uuid, String)>()
                .all(db)
                .await?
                .into_iter()
                .collect()
        };

        let cards: HashMap<Uuid, bank_cards::Model> = if card_ids.is_empty() {
            HashMap::new()
        } else {
            bank_cards::Entity::find()
                .filter(bank_cards::Column::Id.is_in(card_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|card| (card.id, card))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|finance| LedgerEntry {
                booking: finance.booking_id.and_then(|id| bookings.get(&id).cloned()),
                excess_type: finance.excess_id.and_then(|id| excess_types.get(&id).cloned()),
                bank_card: finance.bank_card_id.and_then(|id| cards.get(&id).cloned()),
                finance,
            })
            .collect())
    }
}
