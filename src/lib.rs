//! # Bank Ledger
//!
//! A single-user console bank: customers, their balances and their
//! deposit/withdraw history, persisted to a flat `|`-delimited text file.
//!
//! ## Design Principles
//!
//! - **Exact money**: amounts are `rust_decimal` values that keep their scale
//! - **Strict invariants**: `balance == deposits - withdrawals`, never negative
//! - **All-or-nothing**: failed operations and failed loads change nothing
//! - **Atomic saves**: the ledger file is replaced, never partially written
//!
//! ## Example
//!
//! ```no_run
//! use bank_ledger::{Bank, CustomerRef, Money};
//!
//! let mut bank = Bank::open("accounts.txt").unwrap();
//! bank.set_notifier(|msg| println!("[Alert] {}", msg));
//!
//! let number = bank.create_account("Bob", 40).unwrap();
//! bank.deposit(&CustomerRef::AccountNumber(number), Money::from(500)).unwrap();
//! bank.save().unwrap();
//! ```

pub mod bank;
pub mod codec;
pub mod config;
pub mod customer;
pub mod error;
pub mod menu;
pub mod money;
pub mod query;
pub mod store;
pub mod transaction;

pub use bank::{Bank, CustomerRef, Notifier};
pub use config::Config;
pub use customer::Customer;
pub use error::{LedgerError, Result, ValidationError};
pub use menu::Menu;
pub use money::Money;
pub use query::{Group, Totals};
pub use store::LedgerStore;
pub use transaction::{Transaction, TxKind};
