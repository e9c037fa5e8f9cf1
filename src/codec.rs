//! Flat-file persistence for the ledger.
//!
//! One customer per line, fields separated by `|`:
//!
//! ```text
//! Name|Age|AccountNumber|Balance|TransactionsBlob
//! ```
//!
//! The blob is empty or a `;`-separated list of `Timestamp,Kind,Amount`
//! triples. Timestamps are UTC with seven fractional digits, amounts keep
//! their scale, and fields are never quoted.

use crate::customer::Customer;
use crate::error::{LedgerError, Result};
use crate::money::Money;
use crate::store::LedgerStore;
use crate::transaction::{Transaction, TxKind};
use chrono::{DateTime, Timelike, Utc};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;

const FIELD_DELIMITER: u8 = b'|';
const FIELD_COUNT: usize = 5;
const TX_SEPARATOR: &str = ";";
const TX_FIELD_SEPARATOR: char = ',';

/// One persisted line, field for field.
#[derive(Debug, Serialize, Deserialize)]
struct CustomerRecord {
    name: String,
    age: u32,
    account_number: String,
    balance: Money,
    transactions: String,
}

impl From<&Customer> for CustomerRecord {
    fn from(customer: &Customer) -> Self {
        let transactions = customer
            .transactions()
            .iter()
            .map(format_transaction)
            .collect::<Vec<_>>()
            .join(TX_SEPARATOR);

        CustomerRecord {
            name: customer.name().to_string(),
            age: customer.age(),
            account_number: customer.account_number().to_string(),
            balance: customer.balance(),
            transactions,
        }
    }
}

/// Writes the whole store to `path`, replacing any previous content.
///
/// The data goes to a temporary file next to `path` which is synced and then
/// renamed over it, so readers see either the old file or the new one.
pub fn save(store: &LedgerStore, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_to(store, &mut tmp)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    info!("Saved {} customers to {}", store.len(), path.display());
    Ok(())
}

/// Reads a store from `path`. A missing file is an empty ledger.
///
/// Any malformed line fails the whole load; no partial store is returned.
pub fn load(path: &Path) -> Result<LedgerStore> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No ledger file at {}, starting empty", path.display());
            return Ok(LedgerStore::new());
        }
        Err(e) => return Err(e.into()),
    };

    let store = read_from(BufReader::new(file))?;
    info!("Loaded {} customers from {}", store.len(), path.display());
    Ok(store)
}

/// Serializes every customer, in store order, to `writer`.
pub fn write_to<W: Write>(store: &LedgerStore, writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    for customer in store.all() {
        csv_writer
            .serialize(CustomerRecord::from(customer))
            .map_err(io::Error::from)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Parses a complete store from `reader`. Blank lines are skipped.
pub fn read_from<R: Read>(reader: R) -> Result<LedgerStore> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut store = LedgerStore::new();

    for result in csv_reader.records() {
        let record = result.map_err(read_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let customer = parse_record(&record, line)?;
        debug!(
            "Line {}: loaded account {} with {} transactions",
            line,
            customer.account_number(),
            customer.transactions().len()
        );
        store.add(customer).map_err(|e| corrupt(line, e.to_string()))?;
    }

    Ok(store)
}

/// Renders a timestamp as `YYYY-MM-DDTHH:MM:SS.fffffffZ`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    let ticks = (timestamp.nanosecond() % 1_000_000_000) / 100;
    format!("{}.{:07}Z", timestamp.format("%Y-%m-%dT%H:%M:%S"), ticks)
}

/// Parses any RFC 3339 timestamp and converts it to UTC.
pub fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s.trim()).map(|dt| dt.with_timezone(&Utc))
}

fn format_transaction(tx: &Transaction) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        format_timestamp(&tx.timestamp()),
        tx.kind(),
        tx.amount(),
        sep = TX_FIELD_SEPARATOR
    )
}

fn parse_record(record: &StringRecord, line: u64) -> Result<Customer> {
    if record.len() != FIELD_COUNT {
        return Err(corrupt(
            line,
            format!("expected {} fields, found {}", FIELD_COUNT, record.len()),
        ));
    }

    let row: CustomerRecord = record
        .deserialize(None)
        .map_err(|e| corrupt(line, e.to_string()))?;
    let transactions = parse_transactions(&row.transactions, line)?;

    Customer::restore(
        row.name,
        row.age,
        row.account_number,
        row.balance,
        transactions,
    )
    .map_err(|e| corrupt(line, e.to_string()))
}

fn parse_transactions(blob: &str, line: u64) -> Result<Vec<Transaction>> {
    if blob.trim().is_empty() {
        return Ok(Vec::new());
    }

    blob.split(TX_SEPARATOR)
        .map(|entry| parse_transaction(entry, line))
        .collect()
}

fn parse_transaction(entry: &str, line: u64) -> Result<Transaction> {
    let parts: Vec<&str> = entry.split(TX_FIELD_SEPARATOR).collect();
    if parts.len() != 3 {
        return Err(corrupt(
            line,
            format!("transaction '{}' must have 3 parts, found {}", entry, parts.len()),
        ));
    }

    let timestamp = parse_timestamp(parts[0])
        .map_err(|e| corrupt(line, format!("invalid timestamp '{}': {}", parts[0], e)))?;
    let kind = TxKind::parse(parts[1])
        .ok_or_else(|| corrupt(line, format!("unknown transaction kind '{}'", parts[1])))?;
    let amount = Money::from_str(parts[2])
        .map_err(|e| corrupt(line, format!("invalid amount '{}': {}", parts[2], e)))?;

    Transaction::new(timestamp, kind, amount).map_err(|e| corrupt(line, e.to_string()))
}

fn read_error(err: csv::Error) -> LedgerError {
    if err.is_io_error() {
        return LedgerError::Io(io::Error::from(err));
    }
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    corrupt(line, err.to_string())
}

fn corrupt(line: u64, message: impl Into<String>) -> LedgerError {
    LedgerError::CorruptData {
        line,
        message: message.into(),
    }
}
