//! Transaction and budget file readers
//!
//! CSV rows are matched to columns by header name, so column order is free.
//! Recognized headers: `id`, `date`, `type`, `category`, `description`,
//! `amount` (only `date`, `description` and `amount` are required).

use std::io::Read;

use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::classify::CategoryClassifier;
use crate::error::{Error, Result};
use crate::models::{Budget, Transaction, TransactionType};

/// Hex characters kept from the row hash for derived ids
const DERIVED_ID_LEN: usize = 16;

/// Column positions resolved from the header row
struct Columns {
    id: Option<usize>,
    date: usize,
    transaction_type: Option<usize>,
    category: Option<usize>,
    description: usize,
    amount: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::Import(format!("Missing column: {}", name)))
        };

        Ok(Self {
            id: find("id"),
            date: require("date")?,
            transaction_type: find("type"),
            category: find("category"),
            description: require("description")?,
            amount: require("amount")?,
        })
    }
}

/// Read transactions from CSV
///
/// Rows without a category are classified from their description; rows
/// without a type take it from the sign of the amount.
pub fn read_csv<R: Read>(reader: R, classifier: &CategoryClassifier) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let row = index + 1;
        let record = result?;
        let field = |col: usize| record.get(col).map(str::trim).unwrap_or("");
        let optional = |col: Option<usize>| col.map(field).filter(|s| !s.is_empty());

        let occurred_at = parse_date(field(columns.date))
            .map_err(|e| Error::Import(format!("Row {}: {}", row, e)))?;
        let amount = parse_amount(field(columns.amount))
            .map_err(|e| Error::Import(format!("Row {}: {}", row, e)))?;
        let description = field(columns.description).to_string();

        let transaction_type = match optional(columns.transaction_type) {
            Some(raw) => raw
                .parse::<TransactionType>()
                .map_err(|e| Error::Import(format!("Row {}: {}", row, e)))?,
            None if amount > 0.0 => TransactionType::Income,
            None => TransactionType::Expense,
        };

        let category = match optional(columns.category) {
            Some(category) => category.to_string(),
            None => classifier.classify(&description).to_string(),
        };

        let id = match optional(columns.id) {
            Some(id) => id.to_string(),
            None => derive_id(row, &occurred_at, &description, amount),
        };

        transactions.push(Transaction {
            id,
            amount,
            transaction_type,
            category,
            description,
            occurred_at,
        });
    }

    debug!("Parsed {} CSV transactions", transactions.len());
    Ok(transactions)
}

/// Read a JSON array of transactions
pub fn read_json<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> = serde_json::from_reader(reader)?;
    debug!("Parsed {} JSON transactions", transactions.len());
    Ok(transactions)
}

/// Read a budget previously written as JSON
pub fn read_budget_json<R: Read>(reader: R) -> Result<Budget> {
    Ok(serde_json::from_reader(reader)?)
}

/// Deterministic id for rows that don't carry one
fn derive_id(row: usize, occurred_at: &DateTime<Utc>, description: &str, amount: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update((row as u64).to_be_bytes());
    hasher.update(occurred_at.to_rfc3339().as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(amount.to_be_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(DERIVED_ID_LEN);
    id
}

/// Parse an RFC 3339 timestamp or a plain date (midnight UTC)
fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}
