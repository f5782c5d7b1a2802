//! Test fixtures for tally-core
//!
//! Builders for transactions pinned to a fixed clock so window and month
//! calculations are deterministic.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{Transaction, TransactionType};

/// Fixed "now" used across tests: 2026-03-20 12:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap()
}

pub fn transaction(
    id: &str,
    transaction_type: TransactionType,
    category: &str,
    amount: f64,
    occurred_at: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount,
        transaction_type,
        category: category.to_string(),
        description: format!("{} {}", category, id),
        occurred_at,
    }
}

/// Expense stored with the negative-amount convention, `days_ago` before [`fixed_now`]
pub fn expense(id: &str, category: &str, amount: f64, days_ago: i64) -> Transaction {
    transaction(
        id,
        TransactionType::Expense,
        category,
        -amount.abs(),
        fixed_now() - Duration::days(days_ago),
    )
}

pub fn income(id: &str, amount: f64, days_ago: i64) -> Transaction {
    transaction(
        id,
        TransactionType::Income,
        "Salary",
        amount,
        fixed_now() - Duration::days(days_ago),
    )
}
