//! Customer model and balance operations.
//!
//! Maintains the invariant: `balance == deposits - withdrawals` at all times.

use crate::error::ValidationError;
use crate::money::Money;
use crate::transaction::{Transaction, TxKind};
use chrono::{DateTime, Utc};
use std::fmt;

type Result<T> = std::result::Result<T, ValidationError>;

/// A bank customer with their balance and transaction history.
///
/// # Invariants
///
/// - `balance == sum(deposits) - sum(withdrawals)` after every operation
/// - `balance` is never negative
/// - `name` is non-blank and contains no `|`, CR or LF, so it can be stored
///   as a single flat-file field
///
/// A failed deposit or withdrawal leaves both the balance and the history
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    name: String,
    age: u32,
    account_number: String,
    balance: Money,
    transactions: Vec<Transaction>,
}

impl Customer {
    /// Creates a customer with a zero balance and no history.
    pub fn new(
        name: impl Into<String>,
        age: i64,
        account_number: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        if age < 0 {
            return Err(ValidationError::NegativeAge);
        }
        let age = u32::try_from(age).map_err(|_| ValidationError::AgeOutOfRange(age))?;

        Ok(Customer {
            name,
            age,
            account_number: account_number.into(),
            balance: Money::ZERO,
            transactions: Vec::new(),
        })
    }

    /// Rebuilds a customer from persisted fields.
    ///
    /// The stored balance must be non-negative and agree with the history.
    pub fn restore(
        name: String,
        age: u32,
        account_number: String,
        balance: Money,
        transactions: Vec<Transaction>,
    ) -> Result<Self> {
        validate_name(&name)?;
        if balance.is_negative() {
            return Err(ValidationError::NegativeBalance);
        }

        let expected = history_balance(&transactions)?;
        if balance != expected {
            return Err(ValidationError::BalanceMismatch { balance, expected });
        }

        Ok(Customer {
            name,
            age,
            account_number,
            balance,
            transactions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Transaction history in chronological (insertion) order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Credits `amount` and records a `Deposit` at `at`.
    ///
    /// Fails with `AmountOverflow` if the new balance is out of range.
    pub fn deposit(&mut self, amount: Money, at: DateTime<Utc>) -> Result<&Transaction> {
        let tx = Transaction::new(at, TxKind::Deposit, amount)?;
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(ValidationError::AmountOverflow)?;

        self.balance = balance;
        self.transactions.push(tx);
        debug_assert!(self.is_consistent());
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    /// Debits `amount` and records a `Withdraw` at `at`.
    ///
    /// Fails with `InsufficientBalance` if `amount > balance`.
    pub fn withdraw(&mut self, amount: Money, at: DateTime<Utc>) -> Result<&Transaction> {
        let tx = Transaction::new(at, TxKind::Withdraw, amount)?;

        if amount > self.balance {
            return Err(ValidationError::InsufficientBalance {
                balance: self.balance,
                requested: amount,
            });
        }

        self.balance -= amount;
        self.transactions.push(tx);
        debug_assert!(self.is_consistent());
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    /// Verifies the balance invariant against the recorded history.
    pub fn is_consistent(&self) -> bool {
        !self.balance.is_negative() && history_balance(&self.transactions) == Ok(self.balance)
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Customer: {}, Age: {}, Balance: {}",
            self.name, self.age, self.balance
        )
    }
}

/// Checks that `name` can be stored as a customer name.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.contains(['|', '\n', '\r']) {
        return Err(ValidationError::InvalidName);
    }
    Ok(())
}

// Replays the history in order, so it stays in range whenever every
// intermediate balance did.
fn history_balance(transactions: &[Transaction]) -> Result<Money> {
    transactions.iter().try_fold(Money::ZERO, |balance, tx| {
        match tx.kind() {
            TxKind::Deposit => balance.checked_add(tx.amount()),
            TxKind::Withdraw => balance.checked_sub(tx.amount()),
        }
        .ok_or(ValidationError::AmountOverflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_new_customer_has_zero_balance() {
        let customer = Customer::new("Alice", 30, "10000001").unwrap();
        assert_eq!(customer.name(), "Alice");
        assert_eq!(customer.age(), 30);
        assert_eq!(customer.account_number(), "10000001");
        assert_eq!(customer.balance(), Money::ZERO);
        assert!(customer.transactions().is_empty());
    }

    #[test]
    fn test_new_rejects_bad_identity() {
        assert_eq!(
            Customer::new("", 30, "1").unwrap_err(),
            ValidationError::EmptyName
        );
        assert_eq!(
            Customer::new("   ", 30, "1").unwrap_err(),
            ValidationError::EmptyName
        );
        assert_eq!(
            Customer::new("A|B", 30, "1").unwrap_err(),
            ValidationError::InvalidName
        );
        assert_eq!(
            Customer::new("Alice", -1, "1").unwrap_err(),
            ValidationError::NegativeAge
        );
        assert_eq!(
            Customer::new("Alice", 5_000_000_000, "1").unwrap_err(),
            ValidationError::AgeOutOfRange(5_000_000_000)
        );
        assert!(Customer::new("Alice", 0, "1").is_ok());
        assert!(Customer::new("Alice", i64::from(u32::MAX), "1").is_ok());
    }

    #[test]
    fn test_deposit_increases_balance_and_records() {
        let mut customer = Customer::new("Alice", 30, "10000001").unwrap();
        let tx = customer.deposit(dec("200.00"), now()).unwrap();
        assert_eq!(tx.kind(), TxKind::Deposit);

        assert_eq!(customer.balance().to_string(), "200.00");
        assert_eq!(customer.transactions().len(), 1);
        assert!(customer.is_consistent());
    }

    #[test]
    fn test_withdraw_stores_positive_amount() {
        let mut customer = Customer::new("Alice", 30, "10000001").unwrap();
        customer.deposit(dec("200.00"), now()).unwrap();
        customer.withdraw(dec("50.00"), now()).unwrap();

        assert_eq!(customer.balance().to_string(), "150.00");
        assert_eq!(customer.transactions()[1].amount(), dec("50"));
        assert!(customer.is_consistent());
    }

    #[test]
    fn test_withdraw_exact_balance() {
        let mut customer = Customer::new("Alice", 30, "10000001").unwrap();
        customer.deposit(dec("100"), now()).unwrap();
        customer.withdraw(dec("100"), now()).unwrap();

        assert_eq!(customer.balance(), Money::ZERO);
    }

    #[test]
    fn test_withdraw_insufficient_balance_changes_nothing() {
        let mut customer = Customer::new("Alice", 30, "10000001").unwrap();
        customer.deposit(dec("10.0"), now()).unwrap();

        let err = customer.withdraw(dec("10.01"), now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientBalance {
                balance: dec("10.0"),
                requested: dec("10.01"),
            }
        );
        assert_eq!(customer.balance(), dec("10.0"));
        assert_eq!(customer.transactions().len(), 1);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let mut customer = Customer::new("Alice", 30, "10000001").unwrap();
        assert!(customer.deposit(Money::ZERO, now()).is_err());
        assert!(customer.withdraw(dec("-5"), now()).is_err());
        assert!(customer.transactions().is_empty());
    }

    #[test]
    fn test_deposit_past_largest_balance_changes_nothing() {
        let max = dec("79228162514264337593543950335");
        let mut customer = Customer::new("Alice", 30, "10000001").unwrap();
        customer.deposit(max, now()).unwrap();

        let err = customer.deposit(max, now()).unwrap_err();
        assert_eq!(err, ValidationError::AmountOverflow);
        assert_eq!(customer.balance(), max);
        assert_eq!(customer.transactions().len(), 1);

        customer.withdraw(max, now()).unwrap();
        customer.deposit(max, now()).unwrap();
        assert!(customer.is_consistent());
    }

    #[test]
    fn test_restore_checks_balance_against_history() {
        let tx = Transaction::new(now(), TxKind::Deposit, dec("20")).unwrap();

        let ok = Customer::restore("Al".into(), 1, "1".into(), dec("20.0"), vec![tx.clone()]);
        assert!(ok.is_ok());

        let err = Customer::restore("Al".into(), 1, "1".into(), dec("25"), vec![tx]).unwrap_err();
        assert!(matches!(err, ValidationError::BalanceMismatch { .. }));

        let err = Customer::restore("Al".into(), 1, "1".into(), dec("-1"), vec![]).unwrap_err();
        assert_eq!(err, ValidationError::NegativeBalance);
    }

    #[test]
    fn test_restore_rejects_history_out_of_range() {
        let max = dec("79228162514264337593543950335");
        let tx = Transaction::new(now(), TxKind::Deposit, max).unwrap();

        let err = Customer::restore("Al".into(), 1, "1".into(), max, vec![tx.clone(), tx])
            .unwrap_err();
        assert_eq!(err, ValidationError::AmountOverflow);
    }

    #[test]
    fn test_display() {
        let mut customer = Customer::new("Bob", 40, "10000001").unwrap();
        customer.deposit(dec("500"), now()).unwrap();
        assert_eq!(customer.to_string(), "Customer: Bob, Age: 40, Balance: 500");
    }
}
