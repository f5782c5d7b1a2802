//! Spending analysis over a trailing window
//!
//! Totals are built from transaction magnitudes partitioned by
//! `transaction_type`, so the sign convention of the source data never leaks
//! into the result. Figures are rounded to cents only once, on the way out.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{round2, SpendingAnalysis, Transaction, TransactionType};

/// Aggregates transactions into income/expense/category totals
#[derive(Debug, Clone, Copy, Default)]
pub struct SpendingAnalyzer;

impl SpendingAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze the last `window_days` days, ending now
    pub fn analyze(&self, transactions: &[Transaction], window_days: i64) -> SpendingAnalysis {
        self.analyze_as_of(transactions, window_days, Utc::now())
    }

    /// Analyze the `window_days` days ending at `now`
    ///
    /// A negative window is treated as zero days.
    pub fn analyze_as_of(
        &self,
        transactions: &[Transaction],
        window_days: i64,
        now: DateTime<Utc>,
    ) -> SpendingAnalysis {
        let window_days = window_days.max(0);
        let cutoff = Duration::try_days(window_days)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let in_window = transactions.iter().filter(|tx| tx.occurred_at >= cutoff);
        let analysis = summarize(in_window, Some(window_days));

        debug!(
            window_days,
            considered = analysis.transaction_count,
            total = transactions.len(),
            categories = analysis.spending_by_category.len(),
            "Spending analysis complete"
        );

        analysis
    }

    /// Analyze every supplied transaction, with no time window
    pub fn analyze_all(&self, transactions: &[Transaction]) -> SpendingAnalysis {
        summarize(transactions.iter(), None)
    }
}

/// Aggregate an already-filtered set of transactions
pub(crate) fn summarize<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
    window_days: Option<i64>,
) -> SpendingAnalysis {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut spending_by_category: BTreeMap<String, f64> = BTreeMap::new();
    let mut transaction_count = 0;

    for tx in transactions {
        transaction_count += 1;
        let amount = tx.magnitude();
        match tx.transaction_type {
            TransactionType::Income => total_income += amount,
            TransactionType::Expense => {
                total_expenses += amount;
                *spending_by_category
                    .entry(tx.category.clone())
                    .or_insert(0.0) += amount;
            }
        }
    }

    let net_savings = total_income - total_expenses;
    let savings_rate_percent = if total_income > 0.0 {
        net_savings / total_income * 100.0
    } else {
        0.0
    };

    SpendingAnalysis {
        spending_by_category: spending_by_category
            .into_iter()
            .map(|(category, amount)| (category, round2(amount)))
            .collect(),
        total_income: round2(total_income),
        total_expenses: round2(total_expenses),
        net_savings: round2(net_savings),
        savings_rate_percent: round2(savings_rate_percent),
        transaction_count,
        window_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{expense, fixed_now, income, transaction};

    fn sample_month() -> Vec<Transaction> {
        vec![
            income("pay", 3000.0, 2),
            expense("rent", "Rent", 800.0, 3),
            expense("food", "Food", 300.0, 4),
            expense("bus", "Transport", 150.0, 5),
            expense("movie", "Entertainment", 100.0, 6),
            expense("shop", "Shopping", 200.0, 7),
            expense("power", "Utilities", 150.0, 8),
            expense("clinic", "Healthcare", 75.0, 9),
        ]
    }

    #[test]
    fn test_analyze_sample_month() {
        let analysis = SpendingAnalyzer::new().analyze_as_of(&sample_month(), 30, fixed_now());

        assert_eq!(analysis.total_income, 3000.0);
        assert_eq!(analysis.total_expenses, 1775.0);
        assert_eq!(analysis.net_savings, 1225.0);
        assert_eq!(analysis.savings_rate_percent, 40.83);
        assert_eq!(analysis.spending_by_category.len(), 7);
        assert_eq!(analysis.spent_on("Rent"), 800.0);
        assert_eq!(analysis.transaction_count, 8);
        assert_eq!(analysis.window_days, Some(30));
        assert_eq!(analysis.top_category(), Some(("Rent", 800.0)));
    }

    #[test]
    fn test_sign_convention_does_not_matter() {
        // Same data with expenses stored as positive amounts and income as negative
        let flipped: Vec<Transaction> = sample_month()
            .into_iter()
            .map(|mut tx| {
                tx.amount = -tx.amount;
                tx
            })
            .collect();

        let analysis = SpendingAnalyzer::new().analyze_as_of(&flipped, 30, fixed_now());
        assert_eq!(analysis.total_income, 3000.0);
        assert_eq!(analysis.total_expenses, 1775.0);
        assert!(analysis.spending_by_category.values().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_window_filters_old_transactions() {
        let txs = vec![
            expense("recent", "Food", 20.0, 1),
            expense("edge", "Food", 5.0, 30),
            expense("old", "Food", 100.0, 31),
            income("old-pay", 500.0, 45),
        ];

        let analysis = SpendingAnalyzer::new().analyze_as_of(&txs, 30, fixed_now());
        assert_eq!(analysis.total_expenses, 25.0);
        assert_eq!(analysis.total_income, 0.0);
        assert_eq!(analysis.transaction_count, 2);

        let wider = SpendingAnalyzer::new().analyze_as_of(&txs, 60, fixed_now());
        assert_eq!(wider.total_expenses, 125.0);
        assert_eq!(wider.total_income, 500.0);
    }

    #[test]
    fn test_zero_income_has_zero_savings_rate() {
        let txs = vec![expense("a", "Food", 50.0, 1), expense("b", "Food", 25.0, 2)];
        let analysis = SpendingAnalyzer::new().analyze_as_of(&txs, 30, fixed_now());

        assert_eq!(analysis.total_income, 0.0);
        assert_eq!(analysis.savings_rate_percent, 0.0);
        assert_eq!(analysis.net_savings, -75.0);
    }

    #[test]
    fn test_empty_input() {
        let analysis = SpendingAnalyzer::new().analyze_as_of(&[], 30, fixed_now());
        assert_eq!(analysis, SpendingAnalysis::empty(Some(30)));

        let all_old = vec![expense("old", "Food", 10.0, 400)];
        let analysis = SpendingAnalyzer::new().analyze_as_of(&all_old, 30, fixed_now());
        assert_eq!(analysis.total_expenses, 0.0);
        assert!(analysis.spending_by_category.is_empty());
    }

    #[test]
    fn test_negative_and_huge_windows() {
        let txs = vec![expense("a", "Food", 10.0, 1)];
        let analyzer = SpendingAnalyzer::new();

        let none = analyzer.analyze_as_of(&txs, -5, fixed_now());
        assert_eq!(none.transaction_count, 0);
        assert_eq!(none.window_days, Some(0));

        let all = analyzer.analyze_as_of(&txs, i64::MAX, fixed_now());
        assert_eq!(all.transaction_count, 1);
    }

    #[test]
    fn test_rounding_only_at_boundary() {
        // Three thirds of a cent sum to a full cent before rounding
        let txs: Vec<Transaction> = (0..3)
            .map(|i| {
                transaction(
                    &format!("t{}", i),
                    TransactionType::Expense,
                    "Fees",
                    -0.003333333,
                    fixed_now(),
                )
            })
            .collect();

        let analysis = SpendingAnalyzer::new().analyze_all(&txs);
        assert_eq!(analysis.total_expenses, 0.01);
        assert_eq!(analysis.window_days, None);
    }
}
