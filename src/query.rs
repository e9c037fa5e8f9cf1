//! Read-only reporting over a customer's transaction history.
//!
//! Every function borrows the history and returns references into it, in the
//! original chronological order. An empty result is never an error; sums
//! fail only when they are out of range.

use crate::error::ValidationError;
use crate::money::Money;
use crate::transaction::{Transaction, TxKind};
use chrono::NaiveDate;

/// Aggregate sums over a transaction list.
///
/// Amounts are positive magnitudes, so `all == deposits + withdrawals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub deposits: Money,
    pub withdrawals: Money,
    pub all: Money,
}

/// Transactions sharing one key, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'a, K> {
    pub key: K,
    pub transactions: Vec<&'a Transaction>,
}

impl<K> Group<'_, K> {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of the amounts in this group.
    pub fn total(&self) -> Result<Money, ValidationError> {
        self.transactions
            .iter()
            .try_fold(Money::ZERO, |sum, t| add(sum, t.amount()))
    }
}

/// Entries whose UTC calendar date equals `date`, ignoring time of day.
pub fn filter_by_date(transactions: &[Transaction], date: NaiveDate) -> Vec<&Transaction> {
    transactions.iter().filter(|t| t.date() == date).collect()
}

/// Entries whose kind matches `kind`, ignoring case.
pub fn filter_by_type<'a>(transactions: &'a [Transaction], kind: &str) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| t.kind().matches(kind)).collect()
}

pub fn totals(transactions: &[Transaction]) -> Result<Totals, ValidationError> {
    let mut totals = Totals::default();

    for tx in transactions {
        match tx.kind() {
            TxKind::Deposit => totals.deposits = add(totals.deposits, tx.amount())?,
            TxKind::Withdraw => totals.withdrawals = add(totals.withdrawals, tx.amount())?,
        }
        totals.all = add(totals.all, tx.amount())?;
    }

    Ok(totals)
}

/// Partitions by kind. Groups appear in order of first occurrence.
pub fn group_by_type(transactions: &[Transaction]) -> Vec<Group<'_, TxKind>> {
    group_by(transactions, Transaction::kind)
}

/// Partitions by UTC calendar date. Groups appear in order of first occurrence.
pub fn group_by_date(transactions: &[Transaction]) -> Vec<Group<'_, NaiveDate>> {
    group_by(transactions, Transaction::date)
}

fn add(sum: Money, amount: Money) -> Result<Money, ValidationError> {
    sum.checked_add(amount).ok_or(ValidationError::AmountOverflow)
}

fn group_by<K, F>(transactions: &[Transaction], key_of: F) -> Vec<Group<'_, K>>
where
    K: PartialEq,
    F: Fn(&Transaction) -> K,
{
    let mut groups: Vec<Group<'_, K>> = Vec::new();

    for tx in transactions {
        let key = key_of(tx);
        match groups.iter().position(|g| g.key == key) {
            Some(idx) => groups[idx].transactions.push(tx),
            None => groups.push(Group {
                key,
                transactions: vec![tx],
            }),
        }
    }

    groups
}
