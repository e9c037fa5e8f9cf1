//! Account operations over a ledger file.
//!
//! `Bank` ties a [`LedgerStore`] to the file it is persisted in and reports
//! every successful state change through an optional notification hook.

use crate::codec;
use crate::customer::Customer;
use crate::error::Result;
use crate::money::Money;
use crate::store::LedgerStore;
use chrono::{DateTime, SubsecRound, Utc};
use log::{debug, warn};
use std::fmt;
use std::path::{Path, PathBuf};

/// Receives a human-readable message after each successful operation.
pub type Notifier = Box<dyn Fn(&str)>;

/// How a caller identifies a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerRef {
    /// Exact, case-sensitive name. The oldest customer wins on duplicates.
    Name(String),

    AccountNumber(String),
}

impl fmt::Display for CustomerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerRef::Name(name) => write!(f, "name '{}'", name),
            CustomerRef::AccountNumber(number) => write!(f, "account {}", number),
        }
    }
}

/// The bank service.
///
/// Deposits and withdrawals check, update the balance, and record the
/// transaction as one step: on error nothing has changed and no
/// notification is sent.
pub struct Bank {
    store: LedgerStore,
    path: PathBuf,
    notifier: Option<Notifier>,
}

impl Bank {
    /// Creates a bank over an existing store, saving to `path`.
    pub fn new(store: LedgerStore, path: impl Into<PathBuf>) -> Self {
        Bank {
            store,
            path: path.into(),
            notifier: None,
        }
    }

    /// Loads the ledger at `path`. A missing file opens an empty bank.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = codec::load(&path)?;
        Ok(Bank::new(store, path))
    }

    /// Installs the notification hook, replacing any previous one.
    pub fn set_notifier<F>(&mut self, notifier: F)
    where
        F: Fn(&str) + 'static,
    {
        self.notifier = Some(Box::new(notifier));
    }

    pub fn clear_notifier(&mut self) {
        self.notifier = None;
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn find(&self, customer: &CustomerRef) -> Result<&Customer> {
        match customer {
            CustomerRef::Name(name) => self.store.find_by_name(name),
            CustomerRef::AccountNumber(number) => self.store.find_by_account_number(number),
        }
    }

    /// Opens an account and returns its number.
    pub fn create_account(&mut self, name: &str, age: i64) -> Result<String> {
        let account_number = match self.store.create_account(name, age) {
            Ok(customer) => customer.account_number().to_string(),
            Err(e) => {
                warn!("Account creation for '{}' rejected: {}", name, e);
                return Err(e);
            }
        };

        self.notify(&format!(
            "Account created successfully! Your Account Number is: {}",
            account_number
        ));
        Ok(account_number)
    }

    /// Credits `amount` and returns the new balance.
    pub fn deposit(&mut self, customer: &CustomerRef, amount: Money) -> Result<Money> {
        let at = now();
        let target = self.find_mut(customer)?;
        if let Err(e) = target.deposit(amount, at) {
            warn!("Deposit of {} for {} rejected: {}", amount, customer, e);
            return Err(e.into());
        }

        let balance = target.balance();
        debug!("Deposited {} for {}, balance {}", amount, customer, balance);
        self.notify("Deposit successful!");
        Ok(balance)
    }

    /// Debits `amount` and returns the new balance.
    pub fn withdraw(&mut self, customer: &CustomerRef, amount: Money) -> Result<Money> {
        let at = now();
        let target = self.find_mut(customer)?;
        if let Err(e) = target.withdraw(amount, at) {
            warn!("Withdrawal of {} for {} rejected: {}", amount, customer, e);
            return Err(e.into());
        }

        let balance = target.balance();
        debug!("Withdrew {} for {}, balance {}", amount, customer, balance);
        self.notify("Withdraw successful!");
        Ok(balance)
    }

    /// Writes the whole ledger to the bank's file.
    pub fn save(&self) -> Result<()> {
        codec::save(&self.store, &self.path)?;
        self.notify("Accounts saved to file.");
        Ok(())
    }

    fn find_mut(&mut self, customer: &CustomerRef) -> Result<&mut Customer> {
        match customer {
            CustomerRef::Name(name) => self.store.find_by_name_mut(name),
            CustomerRef::AccountNumber(number) => self.store.find_by_account_number_mut(number),
        }
    }

    fn notify(&self, message: &str) {
        if let Some(notifier) = &self.notifier {
            notifier(message);
        }
    }
}

impl fmt::Debug for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bank")
            .field("store", &self.store)
            .field("path", &self.path)
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

// Transactions are recorded at whole-second precision.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
