use crate::status::FinanceType;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Digits after the decimal point kept by stored amounts
pub const AMOUNT_SCALE: u32 = 4;

/// Exclusive bound on the magnitude of a stored amount (`DECIMAL(16, 4)`)
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Whether `amount` can be stored without rounding or overflowing its column
pub fn fits_storage(amount: Decimal) -> bool {
    amount.normalize().scale() <= AMOUNT_SCALE && amount.abs() < AMOUNT_LIMIT
}

/// Totals derived from an account's ledger rows. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_credit: Decimal,
    pub total_debit: Decimal,
    /// `total_credit - total_debit`
    pub balance: Decimal,
}

impl LedgerSummary {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (FinanceType, Decimal)>,
    {
        let (total_credit, total_debit) = entries.into_iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(credit, debit), (kind, amount)| match kind {
                FinanceType::Credit => (credit + amount, debit),
                FinanceType::Debit => (credit, debit + amount),
            },
        );

        Self {
            total_credit,
            total_debit,
            balance: total_credit - total_debit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_limit() {
        assert_eq!(AMOUNT_LIMIT, Decimal::from(1_000_000_000_000_i64));
    }

    #[test]
    fn test_fits_storage() {
        assert!(fits_storage(dec!(0.0001)));
        assert!(fits_storage(dec!(12.50000)));
        assert!(fits_storage(dec!(999999999999.9999)));
        assert!(fits_storage(dec!(-20)));

        assert!(!fits_storage(dec!(0.00001)));
        assert!(!fits_storage(dec!(1000000000000)));
        assert!(!fits_storage(dec!(-1000000000000)));
    }

    #[test]
    fn test_empty_ledger() {
        let summary = LedgerSummary::from_entries(Vec::new());
        assert_eq!(summary, LedgerSummary::default());
    }

    #[test]
    fn test_balance_is_credit_minus_debit() {
        let summary = LedgerSummary::from_entries([
            (FinanceType::Credit, dec!(250)),
            (FinanceType::Debit, dec!(100)),
            (FinanceType::Credit, dec!(0.1)),
            (FinanceType::Credit, dec!(0.2)),
            (FinanceType::Debit, dec!(0.3)),
        ]);

        assert_eq!(summary.total_credit, dec!(250.3));
        assert_eq!(summary.total_debit, dec!(100.3));
        assert_eq!(summary.balance, dec!(150));
    }

    #[test]
    fn test_balance_may_be_negative() {
        let summary = LedgerSummary::from_entries([(FinanceType::Debit, dec!(42.42))]);
        assert_eq!(summary.balance, dec!(-42.42));
    }
}
