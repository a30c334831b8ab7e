//! Shared setup for the service integration tests.
//!
//! Every test gets its own migrated in-memory SQLite database.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use database::{
    entities::{accounts, bookings, excesses},
    services::{BookingService, ExcessService, NewBooking, NewExcess},
};
use migration::{Migrator, MigratorTrait};
use models::{billing::ChargePolicy, policy::AuthContext, role::Role, status::RentalType};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection,
};
use uuid::Uuid;

pub async fn setup() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Inserts an active account and returns its request context
pub async fn account(db: &DatabaseConnection, role: Role) -> AuthContext {
    let id = Uuid::new_v4();
    let now = Utc::now();

    accounts::ActiveModel {
        id: Set(id),
        name: Set(format!("{} {}", role.as_str(), &id.to_string()[..8])),
        email: Set(format!("{id}@cardoo.test")),
        password_hash: Set("not-a-real-hash".to_string()),
        role: Set(role),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert account");

    AuthContext::new(id, role)
}

pub fn ended_booking(daily_rate: Decimal, rental_days: i32) -> NewBooking {
    let end = Utc::now() - Duration::days(2);
    NewBooking {
        contract_id: format!("CT-{}", &Uuid::new_v4().to_string()[..6]),
        booking_reference: None,
        insurance_amount: Decimal::from(500),
        rental_days,
        rental_type: RentalType::Daily,
        daily_rate,
        start_date: end - Duration::days(rental_days.into()),
        end_date: end,
    }
}

/// A booking owned by `owner` that ended two days ago
pub async fn booking(db: &DatabaseConnection, owner: &AuthContext) -> bookings::Model {
    BookingService::create(
        db,
        owner,
        ended_booking(Decimal::from(100), 3),
        ChargePolicy::default(),
    )
    .await
    .expect("Failed to create booking")
}

pub async fn excess(
    db: &DatabaseConnection,
    owner: &AuthContext,
    booking: &bookings::Model,
    amount: Decimal,
) -> excesses::Model {
    ExcessService::create(
        db,
        owner,
        NewExcess {
            booking_id: booking.id,
            excess_type: "Damage".to_string(),
            amount,
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create excess")
}
