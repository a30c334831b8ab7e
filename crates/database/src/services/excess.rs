//! Excess claims and their lifecycle.
//!
//! Every write that touches an excess also appends to its audit trail in the
//! same transaction. Approval additionally credits the booking owner's ledger,
//! at most once per excess.

use super::{
    ServiceError, ServiceResult,
    action_log::ActionLog,
    finance::{FinanceService, NewFinance},
    notification::NotificationService,
};
use crate::entities::{accounts, bookings, excess_actions, excesses, finances};
use chrono::Utc;
use log::info;
use models::{
    action::{ActionType, NotificationKind},
    billing::{EXCESS_WINDOW_DAYS, can_add_excess},
    document::DocumentSlot,
    ledger::fits_storage,
    policy::{Action, AuthContext, authorize},
    status::{ExcessStatus, FinanceType},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::Expr,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct NewExcess {
    pub booking_id: Uuid,
    pub excess_type: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExcessChanges {
    pub notes: Option<String>,
    pub description: Option<String>,
}

/// An excess with its booking and the booking owner's name
#[derive(Debug, Clone)]
pub struct ExcessListItem {
    pub excess: excesses::Model,
    pub booking: bookings::Model,
    pub owner: Option<accounts::Model>,
}

#[derive(Debug, Clone)]
pub struct ExcessDetails {
    pub excess: excesses::Model,
    pub booking: bookings::Model,
    pub customer_name: Option<String>,
    /// Oldest first, with the acting account
    pub actions: Vec<(excess_actions::Model, Option<accounts::Model>)>,
}

#[derive(Debug, Clone)]
pub struct StatusChange {
    pub excess: excesses::Model,
    pub previous: ExcessStatus,
    /// The ledger credit written by this change, if any
    pub credit: Option<finances::Model>,
}

pub struct ExcessService;

impl ExcessService {
    pub async fn create(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        new: NewExcess,
    ) -> ServiceResult<excesses::Model> {
        let booking = bookings::Entity::find_by_id(new.booking_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Booking"))?;

        authorize(ctx, Action::CreateExcess, Some(booking.account_id))?;

        if new.excess_type.trim().is_empty() {
            return Err(ServiceError::validation("Excess type is required"));
        }
        if new.amount <= Decimal::ZERO {
            return Err(ServiceError::validation("Amount must be greater than zero"));
        }
        if !fits_storage(new.amount) {
            return Err(ServiceError::validation("Amount is out of range"));
        }
        if !can_add_excess(booking.end_date, Utc::now()) {
            return Err(ServiceError::validation(format!(
                "Excesses can only be added after the booking has ended and within {EXCESS_WINDOW_DAYS} days of its end date"
            )));
        }

        let now = Utc::now();
        let excess = excesses::ActiveModel {
            id: Set(Uuid::new_v4()),
            booking_id: Set(booking.id),
            excess_type: Set(new.excess_type),
            amount: Set(new.amount),
            description: Set(new.description.filter(|d| !d.is_empty())),
            notes: Set(new.notes.filter(|n| !n.is_empty())),
            image_identity: Set(None),
            image_contract: Set(None),
            image_license: Set(None),
            image_invoice: Set(None),
            image_company_subscription: Set(None),
            status: Set(ExcessStatus::NeedUpdate),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let txn = db.begin().await?;

        let excess = excess.insert(&txn).await?;
        ActionLog::record(
            &txn,
            excess.id,
            ctx.account_id,
            ActionType::Created,
            format!("Excess created for booking {}", booking.contract_id),
            Some(format!("{} - {}", excess.excess_type, excess.amount)),
        )
        .await?;

        txn.commit().await?;

        info!("Created excess {} on booking {}", excess.id, booking.id);

        NotificationService::notify_staff(
            db,
            NotificationKind::ExcessCreated,
            "New excess",
            &format!(
                "Excess {} of {} was filed for booking {}",
                excess.excess_type, excess.amount, booking.contract_id
            ),
            Some(booking.id),
            Some(excess.id),
        )
        .await;

        Ok(excess)
    }

    /// Excesses of one booking, or of all the caller's bookings
    pub async fn list(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        booking_id: Option<Uuid>,
    ) -> ServiceResult<Vec<ExcessListItem>> {
        let bookings = match booking_id {
            Some(id) => {
                let (booking, owner) = bookings::Entity::find_by_id(id)
                    .find_also_related(accounts::Entity)
                    .one(db)
                    .await?
                    .ok_or(ServiceError::NotFound("Booking"))?;
                authorize(ctx, Action::ViewExcess, Some(booking.account_id))?;
                vec![(booking, owner)]
            }
            None => {
                bookings::Entity::find()
                    .filter(bookings::Column::AccountId.eq(ctx.account_id))
                    .find_also_related(accounts::Entity)
                    .all(db)
                    .await?
            }
        };

        Self::attach_bookings(db, bookings).await
    }

    /// Every excess in the system, for the back office
    pub async fn list_all(
        db: &DatabaseConnection,
        ctx: &AuthContext,
    ) -> ServiceResult<Vec<ExcessListItem>> {
        authorize(ctx, Action::ViewAllRecords, None)?;

        let bookings = bookings::Entity::find()
            .find_also_related(accounts::Entity)
            .all(db)
            .await?;

        Self::attach_bookings(db, bookings).await
    }

    pub async fn details(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
    ) -> ServiceResult<ExcessDetails> {
        let (excess, booking) = Self::find_with_booking(db, id).await?;
        authorize(ctx, Action::ViewExcess, Some(booking.account_id))?;

        let customer_name = accounts::Entity::find_by_id(booking.account_id)
            .one(db)
            .await?
            .map(|a| a.name);
        let actions = ActionLog::for_excess(db, id).await?;

        Ok(ExcessDetails {
            excess,
            booking,
            customer_name,
            actions,
        })
    }

    /// Updates notes and/or description, logging each change
    pub async fn update(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
        changes: ExcessChanges,
    ) -> ServiceResult<excesses::Model> {
        let (excess, booking) = Self::find_with_booking(db, id).await?;
        authorize(ctx, Action::EditExcess, Some(booking.account_id))?;

        let notes = changes.notes.filter(|n| Some(n) != excess.notes.as_ref());
        let description = changes
            .description
            .filter(|d| Some(d) != excess.description.as_ref());

        if notes.is_none() && description.is_none() {
            return Ok(excess);
        }

        let previous_notes = excess.notes.clone();
        let previous_description = excess.description.clone();

        let txn = db.begin().await?;

        let mut active: excesses::ActiveModel = excess.into();
        if let Some(notes) = &notes {
            active.notes = Set(Some(notes.clone()));
        }
        if let Some(description) = &description {
            active.description = Set(Some(description.clone()));
        }
        active.updated_at = Set(Utc::now());
        let excess = active.update(&txn).await?;

        if let Some(notes) = notes {
            ActionLog::record(
                &txn,
                id,
                ctx.account_id,
                ActionType::NotesUpdated,
                "Notes updated",
                Some(Self::describe_change(previous_notes, &notes)),
            )
            .await?;
        }
        if let Some(description) = description {
            ActionLog::record(
                &txn,
                id,
                ctx.account_id,
                ActionType::DescriptionUpdated,
                "Description updated",
                Some(Self::describe_change(previous_description, &description)),
            )
            .await?;
        }

        txn.commit().await?;
        Ok(excess)
    }

    /// Moves an excess to `status`.
    ///
    /// The status update, its audit entry and, for approvals, the ledger credit
    /// to the booking owner are committed together. An excess that was already
    /// credited once is never credited again.
    pub async fn change_status(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
        status: ExcessStatus,
        reason: Option<String>,
    ) -> ServiceResult<StatusChange> {
        let txn = db.begin().await?;

        let (excess, booking) = Self::find_with_booking(&txn, id).await?;
        authorize(ctx, Action::ChangeExcessStatus(status), Some(booking.account_id))?;

        let previous = excess.status;

        let mut active: excesses::ActiveModel = excess.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        let excess = active.update(&txn).await?;

        ActionLog::record(
            &txn,
            id,
            ctx.account_id,
            ActionType::StatusChanged,
            format!("Status changed from {} to {}", previous.as_str(), status.as_str()),
            reason.filter(|r| !r.trim().is_empty()),
        )
        .await?;

        let credit = if status == ExcessStatus::Approved {
            Self::credit_once(&txn, &excess, &booking).await?
        } else {
            None
        };

        txn.commit().await?;

        info!(
            "Excess {id} moved from {} to {} by {}",
            previous.as_str(),
            status.as_str(),
            ctx.account_id
        );

        Ok(StatusChange {
            excess,
            previous,
            credit,
        })
    }

    /// Loads an excess and checks the caller may upload documents to it
    pub async fn authorize_documents(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
    ) -> ServiceResult<excesses::Model> {
        let (excess, booking) = Self::find_with_booking(db, id).await?;
        authorize(ctx, Action::ManageDocuments, Some(booking.account_id))?;
        Ok(excess)
    }

    /// Records stored documents on an excess and sends it back for review
    pub async fn attach_documents(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
        documents: Vec<(DocumentSlot, String)>,
    ) -> ServiceResult<excesses::Model> {
        if documents.is_empty() {
            return Err(ServiceError::validation("No documents were uploaded"));
        }

        let txn = db.begin().await?;

        let (excess, booking) = Self::find_with_booking(&txn, id).await?;
        authorize(ctx, Action::ManageDocuments, Some(booking.account_id))?;

        let mut active: excesses::ActiveModel = excess.into();
        for (slot, reference) in &documents {
            Self::set_document(&mut active, *slot, Some(reference.clone()));
        }
        active.status = Set(ExcessStatus::NeedUpdate);
        active.updated_at = Set(Utc::now());
        let excess = active.update(&txn).await?;

        for (slot, reference) in documents {
            ActionLog::record(
                &txn,
                id,
                ctx.account_id,
                ActionType::DocumentUploaded,
                format!("{} uploaded", slot.label()),
                Some(reference),
            )
            .await?;
        }

        txn.commit().await?;
        Ok(excess)
    }

    /// Clears a document reference, returning the reference that was removed
    pub async fn detach_document(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
        slot: DocumentSlot,
    ) -> ServiceResult<String> {
        let txn = db.begin().await?;

        let (excess, booking) = Self::find_with_booking(&txn, id).await?;
        authorize(ctx, Action::ManageDocuments, Some(booking.account_id))?;

        let reference = excess
            .document(slot)
            .map(str::to_string)
            .ok_or(ServiceError::NotFound("Document"))?;

        excesses::Entity::update_many()
            .col_expr(
                excesses::document_column(slot),
                Expr::value(Option::<String>::None),
            )
            .col_expr(excesses::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(excesses::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        ActionLog::record(
            &txn,
            id,
            ctx.account_id,
            ActionType::DocumentDeleted,
            format!("{} deleted", slot.label()),
            Some(reference.clone()),
        )
        .await?;

        txn.commit().await?;
        Ok(reference)
    }

    /// Stored reference of a document the caller may download
    pub async fn document_reference(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
        slot: DocumentSlot,
    ) -> ServiceResult<String> {
        let (excess, booking) = Self::find_with_booking(db, id).await?;
        authorize(ctx, Action::ViewExcess, Some(booking.account_id))?;

        excess
            .document(slot)
            .map(str::to_string)
            .ok_or(ServiceError::NotFound("Document"))
    }

    async fn credit_once<C: ConnectionTrait>(
        conn: &C,
        excess: &excesses::Model,
        booking: &bookings::Model,
    ) -> ServiceResult<Option<finances::Model>> {
        let already_credited = finances::Entity::find()
            .filter(finances::Column::ExcessId.eq(excess.id))
            .filter(finances::Column::FinanceType.eq(FinanceType::Credit))
            .count(conn)
            .await?
            > 0;

        if already_credited {
            info!("Excess {} was already credited, skipping", excess.id);
            return Ok(None);
        }

        let credit = FinanceService::record(
            conn,
            NewFinance {
                booking_id: Some(booking.id),
                excess_id: Some(excess.id),
                ..NewFinance::new(
                    booking.account_id,
                    FinanceType::Credit,
                    excess.amount,
                    format!("Excess approved - {}", excess.excess_type),
                )
            },
        )
        .await?;

        Ok(Some(credit))
    }

    async fn find_with_booking<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> ServiceResult<(excesses::Model, bookings::Model)> {
        let (excess, booking) = excesses::Entity::find_by_id(id)
            .find_also_related(bookings::Entity)
            .one(conn)
            .await?
            .ok_or(ServiceError::NotFound("Excess"))?;

        let booking = booking.ok_or(ServiceError::NotFound("Booking"))?;
        Ok((excess, booking))
    }

    async fn attach_bookings(
        db: &DatabaseConnection,
        bookings: Vec<(bookings::Model, Option<accounts::Model>)>,
    ) -> ServiceResult<Vec<ExcessListItem>> {
        if bookings.is_empty() {
            return Ok(Vec::new());
        }

        let by_id: HashMap<Uuid, (bookings::Model, Option<accounts::Model>)> = bookings
            .into_iter()
            .map(|(booking, owner)| (booking.id, (booking, owner)))
            .collect();

        let excesses = excesses::Entity::find()
            .filter(excesses::Column::BookingId.is_in(by_id.keys().copied()))
            .order_by_desc(excesses::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(excesses
            .into_iter()
            .filter_map(|excess| {
                let (booking, owner) = by_id.get(&excess.booking_id)?.clone();
                Some(ExcessListItem {
                    excess,
                    booking,
                    owner,
                })
            })
            .collect())
    }

    fn set_document(model: &mut excesses::ActiveModel, slot: DocumentSlot, value: Option<String>) {
        match slot {
            DocumentSlot::Identity => model.image_identity = Set(value),
            DocumentSlot::Contract => model.image_contract = Set(value),
            DocumentSlot::License => model.image_license = Set(value),
            DocumentSlot::Invoice => model.image_invoice = Set(value),
            DocumentSlot::Subscription => model.image_company_subscription = Set(value),
        }
    }

    fn describe_change(previous: Option<String>, current: &str) -> String {
        format!("from {:?} to {current:?}", previous.unwrap_or_default())
    }
}
