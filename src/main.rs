//! Bank Ledger CLI
//!
//! An interactive console bank that keeps customers, balances and their
//! transaction history in a flat text file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- accounts.txt
//! ```
//!
//! # Environment Variables
//!
//! - `BANK_LEDGER_FILE`: Ledger file used when no argument is given
//!   (default `accounts.txt`)
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use bank_ledger::{Bank, Config, Menu, Result};
use log::info;
use std::io;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_env();
    info!("Using ledger file {}", config.ledger_path.display());

    let mut bank = Bank::open(&config.ledger_path)?;
    bank.set_notifier(|message| println!("[Alert] {}", message));

    let stdin = io::stdin();
    let mut menu = Menu::new(stdin.lock(), io::stdout());
    menu.run(&mut bank)
}
