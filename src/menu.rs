//! Interactive console menu.
//!
//! Reads choices line by line from any `BufRead` and writes prompts and
//! reports to any `Write`, so the whole session can be driven from a test.

use crate::bank::{Bank, CustomerRef};
use crate::error::{LedgerError, Result};
use crate::money::Money;
use crate::query;
use chrono::NaiveDate;
use log::debug;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

const MENU: &str = "\n1. Create new account\n2. Deposit\n3. Withdraw\n4. Show balance\n5. Save accounts\n6. Filter transactions\n7. Calculate Totals\n8. Group transactions\n9. Exit";

/// Input errors reported to the user; the session continues afterwards.
#[derive(Error, Debug)]
enum MenuError {
    #[error("Invalid age")]
    InvalidAge,

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid option")]
    InvalidOption,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The console itself failed; ends the session.
    #[error("I/O error: {0}")]
    Console(#[from] io::Error),
}

type MenuResult = std::result::Result<(), MenuError>;

/// A console session over `input` and `output`.
pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Menu { input, output }
    }

    /// Runs until the user exits or input ends; both save the ledger.
    ///
    /// Failed operations print `Error: ...` and the loop continues. Only a
    /// console failure or a failed final save is returned.
    pub fn run(&mut self, bank: &mut Bank) -> Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let choice = match self.prompt("Choose: ")? {
                Some(choice) => choice,
                None => {
                    debug!("Input closed, saving and exiting");
                    return bank.save();
                }
            };

            let outcome = match choice.trim() {
                "1" => self.create_account(bank),
                "2" => self.deposit(bank),
                "3" => self.withdraw(bank),
                "4" => self.show_balance(bank),
                "5" => bank.save().map_err(MenuError::from),
                "6" => self.filter_transactions(bank),
                "7" => self.calculate_totals(bank),
                "8" => self.group_transactions(bank),
                "9" => match bank.save() {
                    Ok(()) => return Ok(()),
                    Err(e) => Err(e.into()),
                },
                _ => {
                    writeln!(self.output, "Invalid choice")?;
                    Ok(())
                }
            };

            match outcome {
                Ok(()) => {}
                Err(MenuError::Console(e)) => return Err(e.into()),
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            }
        }
    }

    fn create_account(&mut self, bank: &mut Bank) -> MenuResult {
        let name = self.ask_text("Customer name: ")?;
        let age = self.ask("Age: ")?;
        let age = age.parse::<i64>().map_err(|_| MenuError::InvalidAge)?;

        bank.create_account(&name, age)?;
        Ok(())
    }

    fn deposit(&mut self, bank: &mut Bank) -> MenuResult {
        let customer = self.select_customer()?;
        bank.find(&customer)?;
        let amount = self.ask_amount()?;

        bank.deposit(&customer, amount)?;
        Ok(())
    }

    fn withdraw(&mut self, bank: &mut Bank) -> MenuResult {
        let customer = self.select_customer()?;
        bank.find(&customer)?;
        let amount = self.ask_amount()?;

        bank.withdraw(&customer, amount)?;
        Ok(())
    }

    fn show_balance(&mut self, bank: &Bank) -> MenuResult {
        let customer = self.select_customer()?;
        let customer = bank.find(&customer)?;

        writeln!(self.output, "{}", customer)?;
        writeln!(self.output, "Transaction history:")?;
        for tx in customer.transactions() {
            writeln!(self.output, "{}", tx)?;
        }
        Ok(())
    }

    fn filter_transactions(&mut self, bank: &Bank) -> MenuResult {
        let customer = self.select_customer()?;
        let history = bank.find(&customer)?.transactions();

        writeln!(self.output, "Filter by: 1) Date  2) Type")?;
        match self.ask("")?.as_str() {
            "1" => {
                let input = self.ask("Enter date (yyyy-MM-dd): ")?;
                let date = match NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
                    Ok(date) => date,
                    Err(_) => {
                        writeln!(self.output, "Invalid date format.")?;
                        return Ok(());
                    }
                };

                let found = query::filter_by_date(history, date);
                writeln!(self.output, "Transactions on {}:", date.format("%Y-%m-%d"))?;
                for tx in &found {
                    writeln!(self.output, "{}", tx)?;
                }
                if found.is_empty() {
                    writeln!(self.output, "No transactions found for this date.")?;
                }
            }
            "2" => {
                let kind = self.ask("Enter type (Deposit/Withdraw): ")?;

                let found = query::filter_by_type(history, &kind);
                writeln!(self.output, "Transactions of type '{}':", kind)?;
                for tx in &found {
                    writeln!(self.output, "{}", tx)?;
                }
                if found.is_empty() {
                    writeln!(self.output, "No transactions found for this type.")?;
                }
            }
            _ => writeln!(self.output, "Invalid option.")?,
        }
        Ok(())
    }

    fn calculate_totals(&mut self, bank: &Bank) -> MenuResult {
        let customer = self.select_customer()?;
        let history = bank.find(&customer)?.transactions();
        let totals = query::totals(history).map_err(LedgerError::from)?;

        writeln!(self.output, "Total Deposits: {}", totals.deposits)?;
        writeln!(self.output, "Total Withdrawals: {}", totals.withdrawals)?;
        writeln!(self.output, "Total of all Transactions: {}", totals.all)?;
        Ok(())
    }

    fn group_transactions(&mut self, bank: &Bank) -> MenuResult {
        let customer = self.select_customer()?;
        let history = bank.find(&customer)?.transactions();

        writeln!(self.output, "Group by: 1) Type  2) Date")?;
        match self.ask("")?.as_str() {
            "1" => {
                for group in query::group_by_type(history) {
                    writeln!(
                        self.output,
                        "\nType: {} (Count: {}, Total: {})",
                        group.key,
                        group.len(),
                        group.total().map_err(LedgerError::from)?
                    )?;
                    for tx in &group.transactions {
                        writeln!(self.output, "{}", tx)?;
                    }
                }
            }
            "2" => {
                for group in query::group_by_date(history) {
                    writeln!(
                        self.output,
                        "\nDate: {} (Count: {}, Total: {})",
                        group.key.format("%Y-%m-%d"),
                        group.len(),
                        group.total().map_err(LedgerError::from)?
                    )?;
                    for tx in &group.transactions {
                        writeln!(self.output, "{}", tx)?;
                    }
                }
            }
            _ => writeln!(self.output, "Invalid option.")?,
        }
        Ok(())
    }

    fn select_customer(&mut self) -> std::result::Result<CustomerRef, MenuError> {
        match self.ask("Search by (1) Name or (2) Account Number? ")?.as_str() {
            "1" => Ok(CustomerRef::Name(self.ask_text("Customer name: ")?)),
            "2" => Ok(CustomerRef::AccountNumber(self.ask("Account Number: ")?)),
            _ => Err(MenuError::InvalidOption),
        }
    }

    fn ask_amount(&mut self) -> std::result::Result<Money, MenuError> {
        let amount = self.ask("Amount: ")?;
        Money::from_str(&amount).map_err(|_| MenuError::InvalidAmount)
    }

    /// Prompts and reads one trimmed line; end of input reads as empty.
    fn ask(&mut self, label: &str) -> io::Result<String> {
        Ok(self.ask_text(label)?.trim().to_string())
    }

    /// Like `ask`, but keeps surrounding whitespace. Used for names.
    fn ask_text(&mut self, label: &str) -> io::Result<String> {
        Ok(self.prompt(label)?.unwrap_or_default())
    }

    /// Prompts and reads one line without its terminator, or `None` at end
    /// of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        if !label.is_empty() {
            write!(self.output, "{}", label)?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }
}
