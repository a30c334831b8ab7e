use super::{
    ServiceError, ServiceResult,
    finance::{FinanceService, NewFinance},
};
use crate::entities::{accounts, bank_cards, finances};
use chrono::Utc;
use log::info;
use models::{
    ledger::{AMOUNT_LIMIT, fits_storage},
    policy::{Action, AuthContext, authorize},
    status::FinanceType,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait, prelude::Expr,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewBankCard {
    /// Only honoured for admins; everybody else registers cards on their own account
    pub account_id: Option<Uuid>,
    pub card_number: String,
    pub card_holder_name: String,
    pub expiry_date: String,
    pub cvv: Option<String>,
    pub balance: Option<Decimal>,
}

/// Editable card details. Balances only move through deposits and withdrawals.
#[derive(Debug, Clone, Default)]
pub struct BankCardChanges {
    pub card_number: Option<String>,
    pub card_holder_name: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
}

/// Result of a deposit or withdrawal
#[derive(Debug, Clone)]
pub struct CardMovement {
    pub bank_card: bank_cards::Model,
    pub finance: finances::Model,
}

pub struct BankCardService;

impl BankCardService {
    pub async fn list(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        requested: Option<Uuid>,
    ) -> ServiceResult<Vec<bank_cards::Model>> {
        authorize(ctx, Action::ManageBankCards, None)?;

        Ok(bank_cards::Entity::find()
            .filter(bank_cards::Column::AccountId.eq(ctx.scoped_account(requested)))
            .order_by_desc(bank_cards::Column::CreatedAt)
            .all(db)
            .await?)
    }

    pub async fn create(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        new: NewBankCard,
    ) -> ServiceResult<bank_cards::Model> {
        authorize(ctx, Action::ManageBankCards, None)?;

        let balance = new.balance.unwrap_or(Decimal::ZERO);
        if balance < Decimal::ZERO {
            return Err(ServiceError::validation("Initial balance cannot be negative"));
        }
        if !fits_storage(balance) {
            return Err(ServiceError::validation("Initial balance is out of range"));
        }

        let account_id = match new.account_id {
            Some(id) if ctx.is_admin() => id,
            _ => ctx.account_id,
        };

        accounts::Entity::find_by_id(account_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Account"))?;

        let now = Utc::now();
        let card = bank_cards::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(account_id),
            card_number: Set(new.card_number),
            card_holder_name: Set(new.card_holder_name),
            expiry_date: Set(new.expiry_date),
            cvv: Set(new.cvv),
            balance: Set(balance),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        info!("Registered bank card {} for account {account_id}", card.id);
        Ok(card)
    }

    pub async fn update(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
        changes: BankCardChanges,
    ) -> ServiceResult<bank_cards::Model> {
        let card = Self::find(db, id).await?;
        authorize(ctx, Action::ModifyBankCard, Some(card.account_id))?;

        let mut active: bank_cards::ActiveModel = card.into();
        if let Some(card_number) = changes.card_number {
            active.card_number = Set(card_number);
        }
        if let Some(card_holder_name) = changes.card_holder_name {
            active.card_holder_name = Set(card_holder_name);
        }
        if let Some(expiry_date) = changes.expiry_date {
            active.expiry_date = Set(expiry_date);
        }
        if let Some(cvv) = changes.cvv {
            active.cvv = Set(Some(cvv));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Deletes a card. Ledger rows posted against it are kept and unlinked.
    pub async fn delete(db: &DatabaseConnection, ctx: &AuthContext, id: Uuid) -> ServiceResult<()> {
        let card = Self::find(db, id).await?;
        authorize(ctx, Action::ModifyBankCard, Some(card.account_id))?;

        let txn = db.begin().await?;

        finances::Entity::update_many()
            .col_expr(finances::Column::BankCardId, Expr::value(Option::<Uuid>::None))
            .filter(finances::Column::BankCardId.eq(id))
            .exec(&txn)
            .await?;

        bank_cards::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!("Deleted bank card {id}");
        Ok(())
    }

    pub async fn deposit(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
        amount: Decimal,
        description: String,
    ) -> ServiceResult<CardMovement> {
        Self::require_positive(amount)?;
        let card = Self::find(db, id).await?;
        authorize(ctx, Action::MoveFunds, Some(card.account_id))?;

        let txn = db.begin().await?;

        let updated = bank_cards::Entity::update_many()
            .col_expr(
                bank_cards::Column::Balance,
                Expr::col(bank_cards::Column::Balance).add(amount),
            )
            .col_expr(bank_cards::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(bank_cards::Column::Id.eq(id))
            .filter(bank_cards::Column::Balance.lt(AMOUNT_LIMIT - amount))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ServiceError::validation("Balance would exceed the card limit"));
        }

        let finance = FinanceService::record(
            &txn,
            NewFinance {
                reference: Some("Card deposit".to_string()),
                bank_card_id: Some(id),
                ..NewFinance::new(card.account_id, FinanceType::Credit, amount, description)
            },
        )
        .await?;

        let bank_card = bank_cards::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("Bank card"))?;

        txn.commit().await?;

        info!("Deposited {amount} on bank card {id}");
        Ok(CardMovement { bank_card, finance })
    }

    /// Withdraws `amount` if the card can cover it.
    ///
    /// The balance check and the decrement are one conditional update, so two
    /// concurrent withdrawals can never take the balance below zero.
    pub async fn withdraw(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
        amount: Decimal,
        description: String,
    ) -> ServiceResult<CardMovement> {
        Self::require_positive(amount)?;
        let card = Self::find(db, id).await?;
        authorize(ctx, Action::MoveFunds, Some(card.account_id))?;

        let txn = db.begin().await?;

        let updated = bank_cards::Entity::update_many()
            .col_expr(
                bank_cards::Column::Balance,
                Expr::col(bank_cards::Column::Balance).sub(amount),
            )
            .col_expr(bank_cards::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(bank_cards::Column::Id.eq(id))
            .filter(bank_cards::Column::Balance.gte(amount))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ServiceError::InsufficientBalance);
        }

        let finance = FinanceService::record(
            &txn,
            NewFinance {
                reference: Some("Card withdrawal".to_string()),
                bank_card_id: Some(id),
                ..NewFinance::new(card.account_id, FinanceType::Debit, amount, description)
            },
        )
        .await?;

        let bank_card = bank_cards::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("Bank card"))?;

        txn.commit().await?;

        info!("Withdrew {amount} from bank card {id}");
        Ok(CardMovement { bank_card, finance })
    }

    async fn find(db: &DatabaseConnection, id: Uuid) -> ServiceResult<bank_cards::Model> {
        bank_cards::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Bank card"))
    }

    fn require_positive(amount: Decimal) -> ServiceResult<()> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::validation("Amount must be greater than zero"));
        }
        if !fits_storage(amount) {
            return Err(ServiceError::validation("Amount is out of range"));
        }
        Ok(())
    }
}
