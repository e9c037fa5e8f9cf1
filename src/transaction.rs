//! Ledger entries recorded against a customer.

use crate::error::ValidationError;
use crate::money::Money;
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use std::fmt;

/// Transaction category. The sign of a movement is carried here, never by
/// the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxKind {
    /// Credit funds to the customer's balance.
    Deposit,

    /// Debit funds from the customer's balance.
    Withdraw,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Deposit => "Deposit",
            TxKind::Withdraw => "Withdraw",
        }
    }

    /// Parses a kind name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything other than `deposit` or `withdraw`.
    pub fn parse(s: &str) -> Option<TxKind> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("deposit") {
            Some(TxKind::Deposit)
        } else if s.eq_ignore_ascii_case("withdraw") {
            Some(TxKind::Withdraw)
        } else {
            None
        }
    }

    /// Case-insensitive comparison against a kind name.
    pub fn matches(&self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable ledger entry.
///
/// # Invariants
///
/// - `amount > 0`; withdrawals are stored as positive magnitudes
/// - `timestamp` is truncated to 100 ns, the precision of the ledger file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    timestamp: DateTime<Utc>,
    kind: TxKind,
    amount: Money,
}

impl Transaction {
    /// Creates a transaction, rejecting non-positive amounts.
    pub fn new(
        timestamp: DateTime<Utc>,
        kind: TxKind,
        amount: Money,
    ) -> std::result::Result<Self, ValidationError> {
        if !amount.is_positive() {
            return Err(ValidationError::InvalidAmount(amount));
        }

        Ok(Transaction {
            timestamp: timestamp.trunc_subsecs(7),
            kind,
            amount,
        })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Calendar date of the timestamp, in UTC.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn kind(&self) -> TxKind {
        self.kind
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.kind,
            self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use std::str::FromStr;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_kind_ignores_case() {
        assert_eq!(TxKind::parse("Deposit"), Some(TxKind::Deposit));
        assert_eq!(TxKind::parse("WITHDRAW"), Some(TxKind::Withdraw));
        assert_eq!(TxKind::parse("  deposit "), Some(TxKind::Deposit));
        assert_eq!(TxKind::parse("withdrawal"), None);
        assert_eq!(TxKind::parse(""), None);
    }

    #[test]
    fn test_kind_matches() {
        assert!(TxKind::Deposit.matches("deposit"));
        assert!(!TxKind::Deposit.matches("withdraw"));
    }

    #[test]
    fn test_new_rejects_non_positive_amount() {
        assert_eq!(
            Transaction::new(at(2, 9), TxKind::Deposit, Money::ZERO),
            Err(ValidationError::InvalidAmount(Money::ZERO))
        );
        assert!(Transaction::new(at(2, 9), TxKind::Withdraw, Money::from(-3)).is_err());
    }

    #[test]
    fn test_new_truncates_timestamp_to_100ns() {
        let precise = at(2, 9).with_nanosecond(123_456_789).unwrap();
        let tx = Transaction::new(precise, TxKind::Deposit, Money::from(1)).unwrap();

        assert_eq!(tx.timestamp().nanosecond(), 123_456_700);
        assert_eq!(tx.timestamp().second(), 0);
    }

    #[test]
    fn test_display() {
        let tx = Transaction::new(
            at(3, 10),
            TxKind::Withdraw,
            Money::from_str("50.00").unwrap(),
        )
        .unwrap();

        assert_eq!(tx.to_string(), "2024-01-03 10:00 - Withdraw - 50.00");
        assert_eq!(tx.date(), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }
}
