//! Runtime configuration for the console application.

use std::env;
use std::path::PathBuf;

/// Ledger file used when nothing else is configured.
pub const DEFAULT_LEDGER_FILE: &str = "accounts.txt";

/// Environment variable naming the ledger file.
pub const LEDGER_FILE_ENV: &str = "BANK_LEDGER_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub ledger_path: PathBuf,
}

impl Config {
    /// Resolves the configuration from the process arguments and environment.
    ///
    /// The first argument wins over `BANK_LEDGER_FILE`, which wins over the
    /// default `accounts.txt`.
    pub fn from_env() -> Self {
        Self::resolve(env::args().nth(1), env::var(LEDGER_FILE_ENV).ok())
    }

    pub fn resolve(arg: Option<String>, env_path: Option<String>) -> Self {
        let ledger_path = arg
            .filter(|p| !p.trim().is_empty())
            .or_else(|| env_path.filter(|p| !p.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_LEDGER_FILE.to_string());

        Config {
            ledger_path: PathBuf::from(ledger_path),
        }
    }
}
