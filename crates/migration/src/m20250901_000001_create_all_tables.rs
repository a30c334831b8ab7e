use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Accounts::Role).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create bookings table
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::ContractId).string().not_null())
                    .col(ColumnDef::new(Bookings::BookingReference).string().unique_key())
                    .col(ColumnDef::new(Bookings::AccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(Bookings::InsuranceAmount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::RentalDays).integer().not_null())
                    .col(ColumnDef::new(Bookings::RentalType).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::DailyRate)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Deleting a booking is an explicit multi-step cascade in the
                    // service layer, so the database only refuses orphans.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-account_id")
                            .from(Bookings::Table, Bookings::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create excesses table
        manager
            .create_table(
                Table::create()
                    .table(Excesses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Excesses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Excesses::BookingId).uuid().not_null())
                    .col(ColumnDef::new(Excesses::ExcessType).string().not_null())
                    .col(
                        ColumnDef::new(Excesses::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Excesses::Description).text())
                    .col(ColumnDef::new(Excesses::Notes).text())
                    .col(ColumnDef::new(Excesses::ImageIdentity).string())
                    .col(ColumnDef::new(Excesses::ImageContract).string())
                    .col(ColumnDef::new(Excesses::ImageLicense).string())
                    .col(ColumnDef::new(Excesses::ImageInvoice).string())
                    .col(ColumnDef::new(Excesses::ImageCompanySubscription).string())
                    .col(ColumnDef::new(Excesses::Status).string().not_null())
                    .col(
                        ColumnDef::new(Excesses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Excesses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-excesses-booking_id")
                            .from(Excesses::Table, Excesses::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create excess_actions table (append-only audit trail)
        manager
            .create_table(
                Table::create()
                    .table(ExcessActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExcessActions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExcessActions::ExcessId).uuid().not_null())
                    .col(ColumnDef::new(ExcessActions::AccountId).uuid().not_null())
                    .col(ColumnDef::new(ExcessActions::ActionType).string().not_null())
                    .col(ColumnDef::new(ExcessActions::Description).text().not_null())
                    .col(ColumnDef::new(ExcessActions::Details).text())
                    .col(
                        ColumnDef::new(ExcessActions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-excess_actions-excess_id")
                            .from(ExcessActions::Table, ExcessActions::ExcessId)
                            .to(Excesses::Table, Excesses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-excess_actions-account_id")
                            .from(ExcessActions::Table, ExcessActions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create bank_cards table
        manager
            .create_table(
                Table::create()
                    .table(BankCards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BankCards::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BankCards::AccountId).uuid().not_null())
                    .col(ColumnDef::new(BankCards::CardNumber).string().not_null())
                    .col(ColumnDef::new(BankCards::CardHolderName).string().not_null())
                    .col(ColumnDef::new(BankCards::ExpiryDate).string().not_null())
                    .col(ColumnDef::new(BankCards::Cvv).string())
                    .col(
                        ColumnDef::new(BankCards::Balance)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BankCards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankCards::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_cards-account_id")
                            .from(BankCards::Table, BankCards::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create finances table (append-only ledger)
        manager
            .create_table(
                Table::create()
                    .table(Finances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Finances::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Finances::AccountId).uuid().not_null())
                    .col(ColumnDef::new(Finances::BookingId).uuid())
                    .col(ColumnDef::new(Finances::ExcessId).uuid())
                    .col(ColumnDef::new(Finances::BankCardId).uuid())
                    .col(
                        ColumnDef::new(Finances::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Finances::FinanceType).string().not_null())
                    .col(ColumnDef::new(Finances::Description).text().not_null())
                    .col(ColumnDef::new(Finances::Reference).string())
                    .col(
                        ColumnDef::new(Finances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-finances-account_id")
                            .from(Finances::Table, Finances::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-finances-booking_id")
                            .from(Finances::Table, Finances::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-finances-excess_id")
                            .from(Finances::Table, Finances::ExcessId)
                            .to(Excesses::Table, Excesses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    // Ledger rows outlive the card they were posted against
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-finances-bank_card_id")
                            .from(Finances::Table, Finances::BankCardId)
                            .to(BankCards::Table, BankCards::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::AccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(Notifications::NotificationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::BookingId).uuid())
                    .col(ColumnDef::new(Notifications::ExcessId).uuid())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-account_id")
                            .from(Notifications::Table, Notifications::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-booking_id")
                            .from(Notifications::Table, Notifications::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-excess_id")
                            .from(Notifications::Table, Notifications::ExcessId)
                            .to(Excesses::Table, Excesses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Finances::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(BankCards::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ExcessActions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Excesses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Accounts {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Bookings {
    Table,
    Id,
    ContractId,
    BookingReference,
    AccountId,
    InsuranceAmount,
    RentalDays,
    RentalType,
    DailyRate,
    StartDate,
    EndDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Excesses {
    Table,
    Id,
    BookingId,
    ExcessType,
    Amount,
    Description,
    Notes,
    ImageIdentity,
    ImageContract,
    ImageLicense,
    ImageInvoice,
    ImageCompanySubscription,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum ExcessActions {
    Table,
    Id,
    ExcessId,
    AccountId,
    ActionType,
    Description,
    Details,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum BankCards {
    Table,
    Id,
    AccountId,
    CardNumber,
    CardHolderName,
    ExpiryDate,
    Cvv,
    Balance,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Finances {
    Table,
    Id,
    AccountId,
    BookingId,
    ExcessId,
    BankCardId,
    Amount,
    FinanceType,
    Description,
    Reference,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Notifications {
    Table,
    Id,
    AccountId,
    NotificationType,
    Title,
    Message,
    BookingId,
    ExcessId,
    IsRead,
    CreatedAt,
}
