use super::{
    ServiceError, ServiceResult,
    finance::{FinanceService, NewFinance},
    notification::NotificationService,
};
use crate::entities::{accounts, bookings, excess_actions, excesses, finances, notifications};
use chrono::{DateTime, Utc};
use log::info;
use models::{
    action::NotificationKind,
    billing::ChargePolicy,
    ledger::fits_storage,
    policy::{Action, AuthContext, authorize},
    status::{BookingStatus, FinanceType, RentalType},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub contract_id: String,
    pub booking_reference: Option<String>,
    pub insurance_amount: Decimal,
    pub rental_days: i32,
    pub rental_type: RentalType,
    pub daily_rate: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    pub contract_id: Option<String>,
    pub booking_reference: Option<String>,
    pub insurance_amount: Option<Decimal>,
    pub rental_days: Option<i32>,
    pub rental_type: Option<RentalType>,
    pub daily_rate: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
}

/// A booking with the name of the account that owns it
pub type BookingWithOwner = (bookings::Model, Option<accounts::Model>);

#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub booking: bookings::Model,
    pub excesses: Vec<excesses::Model>,
    pub finances: Vec<finances::Model>,
}

pub struct BookingService;

impl BookingService {
    /// Creates a booking owned by the caller and charges it to their ledger.
    ///
    /// Staff are notified once the booking is committed.
    pub async fn create(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        new: NewBooking,
        policy: ChargePolicy,
    ) -> ServiceResult<bookings::Model> {
        Self::validate_terms(
            &new.contract_id,
            new.insurance_amount,
            new.rental_days,
            new.daily_rate,
        )?;
        Self::validate_dates(new.start_date, new.end_date)?;

        let charge = policy
            .charge(new.daily_rate, new.rental_days)
            .filter(|charge| fits_storage(*charge))
            .ok_or_else(|| ServiceError::validation("Charge is out of range"))?;
        let now = Utc::now();

        let txn = db.begin().await?;

        let booking = bookings::ActiveModel {
            id: Set(Uuid::new_v4()),
            contract_id: Set(new.contract_id),
            booking_reference: Set(new.booking_reference.filter(|r| !r.trim().is_empty())),
            account_id: Set(ctx.account_id),
            insurance_amount: Set(new.insurance_amount),
            rental_days: Set(new.rental_days),
            rental_type: Set(new.rental_type),
            daily_rate: Set(new.daily_rate),
            start_date: Set(new.start_date),
            end_date: Set(new.end_date),
            status: Set(BookingStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        FinanceService::record(
            &txn,
            NewFinance {
                booking_id: Some(booking.id),
                ..NewFinance::new(
                    ctx.account_id,
                    FinanceType::Debit,
                    charge,
                    format!("Car rental charge - {}", booking.contract_id),
                )
            },
        )
        .await?;

        txn.commit().await?;

        info!(
            "Created booking {} for account {} (charged {charge})",
            booking.id, ctx.account_id
        );

        NotificationService::notify_staff(
            db,
            NotificationKind::BookingCreated,
            "New booking",
            &format!("Booking {} was created", booking.contract_id),
            Some(booking.id),
            None,
        )
        .await;

        Ok(booking)
    }

    /// Bookings of the caller (or of `requested` for staff), newest first
    pub async fn list(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        requested: Option<Uuid>,
        status: Option<BookingStatus>,
    ) -> ServiceResult<Vec<BookingWithOwner>> {
        let mut query = bookings::Entity::find()
            .filter(bookings::Column::AccountId.eq(ctx.scoped_account(requested)));

        if let Some(status) = status {
            query = query.filter(bookings::Column::Status.eq(status));
        }

        Ok(query
            .find_also_related(accounts::Entity)
            .order_by_desc(bookings::Column::CreatedAt)
            .all(db)
            .await?)
    }

    /// Every booking in the system, for the back office
    pub async fn list_all(
        db: &DatabaseConnection,
        ctx: &AuthContext,
    ) -> ServiceResult<Vec<BookingWithOwner>> {
        authorize(ctx, Action::ViewAllRecords, None)?;

        Ok(bookings::Entity::find()
            .find_also_related(accounts::Entity)
            .order_by_desc(bookings::Column::CreatedAt)
            .all(db)
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
    ) -> ServiceResult<BookingDetails> {
        let booking = Self::find(db, id).await?;
        authorize(ctx, Action::ViewBooking, Some(booking.account_id))?;

        let excesses = excesses::Entity::find()
            .filter(excesses::Column::BookingId.eq(id))
            .order_by_desc(excesses::Column::CreatedAt)
            .all(db)
            .await?;
        let finances = FinanceService::for_booking(db, id).await?;

        Ok(BookingDetails {
            booking,
            excesses,
            finances,
        })
    }

    pub async fn update(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
        changes: BookingChanges,
    ) -> ServiceResult<bookings::Model> {
        let booking = Self::find(db, id).await?;
        authorize(ctx, Action::ModifyBooking, Some(booking.account_id))?;

        Self::validate_terms(
            changes.contract_id.as_deref().unwrap_or(&booking.contract_id),
            changes.insurance_amount.unwrap_or(booking.insurance_amount),
            changes.rental_days.unwrap_or(booking.rental_days),
            changes.daily_rate.unwrap_or(booking.daily_rate),
        )?;
        Self::validate_dates(
            changes.start_date.unwrap_or(booking.start_date),
            changes.end_date.unwrap_or(booking.end_date),
        )?;

        let mut active: bookings::ActiveModel = booking.into();
        if let Some(contract_id) = changes.contract_id {
            active.contract_id = Set(contract_id);
        }
        if let Some(reference) = changes.booking_reference {
            active.booking_reference = Set(Some(reference).filter(|r| !r.trim().is_empty()));
        }
        if let Some(insurance_amount) = changes.insurance_amount {
            active.insurance_amount = Set(insurance_amount);
        }
        if let Some(rental_days) = changes.rental_days {
            active.rental_days = Set(rental_days);
        }
        if let Some(rental_type) = changes.rental_type {
            active.rental_type = Set(rental_type);
        }
        if let Some(daily_rate) = changes.daily_rate {
            active.daily_rate = Set(daily_rate);
        }
        if let Some(start_date) = changes.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = changes.end_date {
            active.end_date = Set(end_date);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());

        let booking = active.update(db).await?;
        info!("Updated booking {id}");
        Ok(booking)
    }

    /// Deletes a booking and everything hanging off it in one transaction.
    ///
    /// Returns the document references of the removed excesses so the caller
    /// can clean up storage.
    pub async fn delete(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
    ) -> ServiceResult<Vec<String>> {
        let booking = Self::find(db, id).await?;
        authorize(ctx, Action::ModifyBooking, Some(booking.account_id))?;

        let txn = db.begin().await?;

        let excesses = excesses::Entity::find()
            .filter(excesses::Column::BookingId.eq(id))
            .all(&txn)
            .await?;
        let excess_ids: Vec<Uuid> = excesses.iter().map(|e| e.id).collect();
        let documents: Vec<String> = excesses
            .iter()
            .flat_map(|e| e.documents().map(|(_, name)| name.to_string()))
            .collect();

        if !excess_ids.is_empty() {
            excess_actions::Entity::delete_many()
                .filter(excess_actions::Column::ExcessId.is_in(excess_ids.clone()))
                .exec(&txn)
                .await?;

            finances::Entity::delete_many()
                .filter(finances::Column::ExcessId.is_in(excess_ids.clone()))
                .exec(&txn)
                .await?;
        }

        finances::Entity::delete_many()
            .filter(finances::Column::BookingId.eq(id))
            .exec(&txn)
            .await?;

        let mut linked = Condition::any().add(notifications::Column::BookingId.eq(id));
        if !excess_ids.is_empty() {
            linked = linked.add(notifications::Column::ExcessId.is_in(excess_ids));
        }
        notifications::Entity::delete_many()
            .filter(linked)
            .exec(&txn)
            .await?;

        excesses::Entity::delete_many()
            .filter(excesses::Column::BookingId.eq(id))
            .exec(&txn)
            .await?;

        bookings::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!("Deleted booking {id} with {} excesses", excesses.len());
        Ok(documents)
    }

    pub async fn excess_count(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
    ) -> ServiceResult<u64> {
        let booking = Self::find(db, id).await?;
        authorize(ctx, Action::ViewBooking, Some(booking.account_id))?;

        Ok(excesses::Entity::find()
            .filter(excesses::Column::BookingId.eq(id))
            .count(db)
            .await?)
    }

    /// Bookings an account created since `since`
    pub async fn count_created_since(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        account_id: Uuid,
        since: DateTime<Utc>,
    ) -> ServiceResult<u64> {
        authorize(ctx, Action::ViewAllRecords, None)?;

        Ok(bookings::Entity::find()
            .filter(bookings::Column::AccountId.eq(account_id))
            .filter(bookings::Column::CreatedAt.gte(since))
            .count(db)
            .await?)
    }

    async fn find(db: &DatabaseConnection, id: Uuid) -> ServiceResult<bookings::Model> {
        bookings::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Booking"))
    }

    fn validate_terms(
        contract_id: &str,
        insurance_amount: Decimal,
        rental_days: i32,
        daily_rate: Decimal,
    ) -> ServiceResult<()> {
        if contract_id.trim().is_empty() {
            return Err(ServiceError::validation("Contract id is required"));
        }
        if insurance_amount <= Decimal::ZERO {
            return Err(ServiceError::validation("Insurance amount must be positive"));
        }
        if rental_days <= 0 {
            return Err(ServiceError::validation("Rental days must be positive"));
        }
        if daily_rate <= Decimal::ZERO {
            return Err(ServiceError::validation("Daily rate must be positive"));
        }
        if !fits_storage(insurance_amount) || !fits_storage(daily_rate) {
            return Err(ServiceError::validation("Amount is out of range"));
        }
        Ok(())
    }

    fn validate_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> ServiceResult<()> {
        if end <= start {
            return Err(ServiceError::validation("End date must be after start date"));
        }
        Ok(())
    }
}
