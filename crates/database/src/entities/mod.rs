pub mod accounts;
pub mod bank_cards;
pub mod bookings;
pub mod excess_actions;
pub mod excesses;
pub mod finances;
pub mod notifications;
