//! Domain models for Tally

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Catch-all category for transactions no keyword matched
pub const OTHER_CATEGORY: &str = "Other";

/// Direction of money movement
///
/// This is the authoritative income/expense signal. The sign of
/// [`Transaction::amount`] is never consulted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "credit" => Ok(Self::Income),
            "expense" | "debit" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Signed as supplied by the source; only the magnitude is used
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    /// Absolute value of the amount
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }
}

/// Aggregated income/expense figures for a set of transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingAnalysis {
    /// Summed expense magnitude per category
    pub spending_by_category: BTreeMap<String, f64>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_savings: f64,
    /// 0 when there was no income
    pub savings_rate_percent: f64,
    /// Transactions that fell inside the window
    pub transaction_count: usize,
    /// Trailing window in days (None = whole history)
    pub window_days: Option<i64>,
}

impl SpendingAnalysis {
    /// An all-zero analysis
    pub fn empty(window_days: Option<i64>) -> Self {
        Self {
            spending_by_category: BTreeMap::new(),
            total_income: 0.0,
            total_expenses: 0.0,
            net_savings: 0.0,
            savings_rate_percent: 0.0,
            transaction_count: 0,
            window_days,
        }
    }

    /// Category with the largest spend (first by name on ties)
    pub fn top_category(&self) -> Option<(&str, f64)> {
        self.spending_by_category
            .iter()
            .fold(None, |best: Option<(&str, f64)>, (name, amount)| match best {
                Some((_, best_amount)) if best_amount >= *amount => best,
                _ => Some((name.as_str(), *amount)),
            })
    }

    /// Spend recorded for a category (0 if none)
    pub fn spent_on(&self, category: &str) -> f64 {
        self.spending_by_category
            .get(category)
            .copied()
            .unwrap_or(0.0)
    }
}

/// A recent transaction whose amount is a statistical outlier for its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub transaction_id: String,
    pub category: String,
    /// Magnitude of the flagged transaction
    pub amount: f64,
    pub z_score: f64,
    /// Historical mean the score was measured against
    pub category_mean: f64,
    pub occurred_at: DateTime<Utc>,
    pub message: String,
}

/// A monthly budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub user_id: String,
    pub monthly_income: f64,
    pub savings_goal: Option<f64>,
    /// Allocated amount per category
    pub allocations: BTreeMap<String, f64>,
    /// First day of the month
    pub start_date: NaiveDate,
    /// Last day of the month (inclusive)
    pub end_date: NaiveDate,
}

impl Budget {
    pub fn total_allocated(&self) -> f64 {
        round2(self.allocations.values().sum())
    }

    /// Income left over once every allocation is spent
    pub fn projected_savings(&self) -> f64 {
        round2(self.monthly_income - self.allocations.values().sum::<f64>())
    }

    /// True when no goal is set or projected savings cover it
    pub fn meets_savings_goal(&self) -> bool {
        match self.savings_goal {
            Some(goal) => self.projected_savings() >= goal,
            None => true,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// How far over its threshold a budget category is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// 90% or more of the allocation spent
    Warning,
    /// The allocation is used up
    Exceeded,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" => Ok(Self::Warning),
            "exceeded" => Ok(Self::Exceeded),
            _ => Err(format!("Unknown alert severity: {}", s)),
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget threshold alert for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAlert {
    pub category: String,
    pub allocated: f64,
    pub spent: f64,
    pub utilization_percent: f64,
    pub severity: AlertSeverity,
    pub message: String,
}

/// Round to cents
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First and last day of the calendar month containing `date`
pub fn month_bounds(date: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| Error::InvalidInput(format!("No month start for {}", date)))?;
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    let end = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| Error::InvalidInput(format!("No month end for {}", date)))?;
    Ok((start, end))
}
