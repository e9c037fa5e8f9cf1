//! In-memory collection of customers.

use crate::customer::Customer;
use crate::error::{LedgerError, Result, ValidationError};
use log::debug;
use std::collections::HashMap;

/// First account number issued by an empty ledger.
pub const FIRST_ACCOUNT_NUMBER: u64 = 10_000_001;

/// All customers of the bank, in creation order.
///
/// Creation order is also the order customers are written to disk. Account
/// numbers are indexed; name lookups scan in order and return the first
/// match, so duplicate names resolve to the oldest customer.
///
/// The store owns the account-number counter. It always stays above every
/// numeric account number it holds, so a store loaded from disk never issues
/// a number that is already taken.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    customers: Vec<Customer>,
    by_account: HashMap<String, usize>,
    next_account_number: u64,
}

impl LedgerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        LedgerStore {
            customers: Vec::new(),
            by_account: HashMap::new(),
            next_account_number: FIRST_ACCOUNT_NUMBER,
        }
    }

    /// Appends a customer.
    ///
    /// Fails with `DuplicateAccountNumber` if the account number is taken.
    pub fn add(&mut self, customer: Customer) -> Result<()> {
        let account_number = customer.account_number().to_string();
        if self.by_account.contains_key(&account_number) {
            return Err(ValidationError::DuplicateAccountNumber(account_number).into());
        }

        if let Ok(n) = account_number.parse::<u64>() {
            self.next_account_number = self.next_account_number.max(n.saturating_add(1));
        }

        self.by_account.insert(account_number, self.customers.len());
        self.customers.push(customer);
        Ok(())
    }

    /// Validates the identity, then issues the next account number.
    ///
    /// A rejected request does not consume a number.
    pub fn create_account(&mut self, name: &str, age: i64) -> Result<&Customer> {
        let account_number = self.next_account_number.to_string();
        let customer = Customer::new(name, age, account_number.as_str())?;

        self.add(customer)?;
        debug!("Created account {} for {}", account_number, name);
        Ok(&self.customers[self.customers.len() - 1])
    }

    /// Account number the next successful `create_account` will issue.
    pub fn next_account_number(&self) -> u64 {
        self.next_account_number
    }

    /// First customer whose name matches exactly (case-sensitive).
    pub fn find_by_name(&self, name: &str) -> Result<&Customer> {
        self.customers
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| LedgerError::NotFound(name.to_string()))
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Result<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| LedgerError::NotFound(name.to_string()))
    }

    pub fn find_by_account_number(&self, account_number: &str) -> Result<&Customer> {
        let idx = self.index_of(account_number)?;
        Ok(&self.customers[idx])
    }

    pub fn find_by_account_number_mut(&mut self, account_number: &str) -> Result<&mut Customer> {
        let idx = self.index_of(account_number)?;
        Ok(&mut self.customers[idx])
    }

    /// All customers in creation order.
    pub fn all(&self) -> &[Customer] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    fn index_of(&self, account_number: &str) -> Result<usize> {
        self.by_account
            .get(account_number)
            .copied()
            .ok_or_else(|| LedgerError::NotFound(account_number.to_string()))
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Two stores are equal when they hold the same customers in the same order.
impl PartialEq for LedgerStore {
    fn eq(&self, other: &Self) -> bool {
        self.customers == other.customers
    }
}

impl Eq for LedgerStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::Utc;

    #[test]
    fn test_account_numbers_are_sequential() {
        let mut store = LedgerStore::new();
        let first = store.create_account("Alice", 30).unwrap().account_number().to_string();
        let second = store.create_account("Bob", 40).unwrap().account_number().to_string();

        assert_eq!(first, "10000001");
        assert_eq!(second, "10000002");
        assert_eq!(store.next_account_number(), 10_000_003);
    }

    #[test]
    fn test_failed_creation_does_not_consume_number() {
        let mut store = LedgerStore::new();
        assert!(store.create_account("", 30).unwrap_err().is_validation());
        assert!(store.create_account("Carol", -2).unwrap_err().is_validation());

        let customer = store.create_account("Carol", 22).unwrap();
        assert_eq!(customer.account_number(), "10000001");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_by_name_returns_first_match() {
        let mut store = LedgerStore::new();
        store.create_account("Sam", 30).unwrap();
        store.create_account("Sam", 50).unwrap();

        let found = store.find_by_name("Sam").unwrap();
        assert_eq!(found.account_number(), "10000001");
        assert!(matches!(store.find_by_name("sam"), Err(LedgerError::NotFound(_))));
    }

    #[test]
    fn test_find_by_account_number() {
        let mut store = LedgerStore::new();
        store.create_account("Alice", 30).unwrap();
        store.create_account("Bob", 40).unwrap();

        assert_eq!(store.find_by_account_number("10000002").unwrap().name(), "Bob");
        assert!(matches!(
            store.find_by_account_number("99"),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_mutable_lookup_updates_stored_customer() {
        let mut store = LedgerStore::new();
        store.create_account("Alice", 30).unwrap();

        store
            .find_by_account_number_mut("10000001")
            .unwrap()
            .deposit(Money::from(25), Utc::now())
            .unwrap();
        assert_eq!(store.find_by_name("Alice").unwrap().balance(), Money::from(25));
    }

    #[test]
    fn test_add_rejects_duplicate_account_number() {
        let mut store = LedgerStore::new();
        store.add(Customer::new("Alice", 30, "10000001").unwrap()).unwrap();

        let err = store
            .add(Customer::new("Bob", 40, "10000001").unwrap())
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_raises_counter_past_existing_numbers() {
        let mut store = LedgerStore::new();
        store.add(Customer::new("Alice", 30, "10000007").unwrap()).unwrap();
        store.add(Customer::new("Bob", 40, "legacy-1").unwrap()).unwrap();
        store.add(Customer::new("Carl", 40, "10000003").unwrap()).unwrap();

        let created = store.create_account("Dana", 20).unwrap();
        assert_eq!(created.account_number(), "10000008");
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let mut store = LedgerStore::new();
        for name in ["Zed", "Amy", "Kim"] {
            store.create_account(name, 1).unwrap();
        }

        let names: Vec<_> = store.all().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Kim"]);
    }
}
