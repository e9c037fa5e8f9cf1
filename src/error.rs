//! Error types for the bank ledger.

use crate::money::Money;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while operating on the ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A request was rejected before it changed any state
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No customer matched the lookup
    #[error("Customer not found: {0}")]
    NotFound(String),

    /// A persisted record could not be parsed
    #[error("Corrupt ledger data at line {line}: {message}")]
    CorruptData { line: u64, message: String },

    /// Failed to open, read or write the ledger file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rule violations detected before a state change is applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name cannot contain '|' or line breaks")]
    InvalidName,

    #[error("Age cannot be negative")]
    NegativeAge,

    #[error("Age {0} is out of range")]
    AgeOutOfRange(i64),

    #[error("Invalid amount: {0}")]
    InvalidAmount(Money),

    #[error("Insufficient balance: balance {balance}, requested {requested}")]
    InsufficientBalance { balance: Money, requested: Money },

    #[error("Amount exceeds the largest representable balance")]
    AmountOverflow,

    #[error("Balance cannot be less than 0")]
    NegativeBalance,

    #[error("Balance {balance} does not match transaction history ({expected})")]
    BalanceMismatch { balance: Money, expected: Money },

    #[error("Account number {0} is already in use")]
    DuplicateAccountNumber(String),
}

impl LedgerError {
    /// Returns `true` for errors caused by a rejected request.
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }
}
