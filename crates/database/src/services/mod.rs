mod account;
mod action_log;
mod bank_card;
mod booking;
mod error;
mod excess;
mod finance;
mod notification;

pub use account::{AccountChanges, AccountOverview, AccountService, NewAccount};
pub use action_log::ActionLog;
pub use bank_card::{BankCardChanges, BankCardService, CardMovement, NewBankCard};
pub use booking::{BookingChanges, BookingDetails, BookingService, BookingWithOwner, NewBooking};
pub use error::{ServiceError, ServiceResult};
pub use excess::{
    ExcessChanges, ExcessDetails, ExcessListItem, ExcessService, NewExcess, StatusChange,
};
pub use finance::{BookingRef, FinanceService, Ledger, LedgerEntry, NewFinance};
pub use notification::{NewNotification, NotificationService};
