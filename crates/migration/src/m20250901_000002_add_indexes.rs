use crate::m20250901_000001_create_all_tables::{
    BankCards, Bookings, ExcessActions, Excesses, Finances, Notifications,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Bookings are listed per owner, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_account_id")
                    .table(Bookings::Table)
                    .col(Bookings::AccountId)
                    .col(Bookings::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_excesses_booking_id")
                    .table(Excesses::Table)
                    .col(Excesses::BookingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_excess_actions_excess_id")
                    .table(ExcessActions::Table)
                    .col(ExcessActions::ExcessId)
                    .to_owned(),
            )
            .await?;

        // Ledger reads are always per account
        manager
            .create_index(
                Index::create()
                    .name("idx_finances_account_id")
                    .table(Finances::Table)
                    .col(Finances::AccountId)
                    .col(Finances::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Used by the at-most-once credit check and the booking cascade
        manager
            .create_index(
                Index::create()
                    .name("idx_finances_excess_id")
                    .table(Finances::Table)
                    .col(Finances::ExcessId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_finances_booking_id")
                    .table(Finances::Table)
                    .col(Finances::BookingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bank_cards_account_id")
                    .table(BankCards::Table)
                    .col(BankCards::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_account_id_is_read")
                    .table(Notifications::Table)
                    .col(Notifications::AccountId)
                    .col(Notifications::IsRead)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        for name in [
            "idx_notifications_account_id_is_read",
            "idx_bank_cards_account_id",
            "idx_finances_booking_id",
            "idx_finances_excess_id",
            "idx_finances_account_id",
            "idx_excess_actions_excess_id",
            "idx_excesses_booking_id",
            "idx_bookings_account_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
