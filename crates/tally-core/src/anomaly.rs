//! Statistical anomaly detection
//!
//! Flags recent expenses whose amount sits unusually far from the mean of
//! their category. Each category's history is summarized with the sample
//! mean and sample standard deviation, and only the most recent transactions
//! of the category are scored.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::models::{round2, AnomalyReport, Transaction};

/// Default z-score above which a transaction is reported
pub const DEFAULT_Z_THRESHOLD: f64 = 2.0;

/// A spread this small is float noise from identical amounts, not variance
const MIN_STD_DEV: f64 = 1e-9;

/// Detection configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyConfig {
    /// Z-score threshold used when the caller doesn't supply one
    pub z_threshold: f64,
    /// Minimum transactions overall before any detection runs
    pub min_transactions: usize,
    /// Minimum expenses in a category before it is scored
    pub min_category_points: usize,
    /// How many of the latest transactions per category are examined
    pub recent_count: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            z_threshold: DEFAULT_Z_THRESHOLD,
            min_transactions: 10,
            min_category_points: 6,
            recent_count: 5,
        }
    }
}

/// Scans a transaction history for outlying recent expenses
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnomalyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Detect using the configured threshold
    pub fn detect_default(&self, transactions: &[Transaction]) -> Vec<AnomalyReport> {
        self.detect(transactions, self.config.z_threshold)
    }

    /// Report recent expenses with `z > z_threshold`
    ///
    /// Too little history yields an empty result rather than an error.
    /// Reports are ordered by category name, then chronologically.
    pub fn detect(&self, transactions: &[Transaction], z_threshold: f64) -> Vec<AnomalyReport> {
        if !z_threshold.is_finite() || z_threshold <= 0.0 {
            warn!(z_threshold, "Ignoring anomaly detection with invalid threshold");
            return Vec::new();
        }

        if transactions.len() < self.config.min_transactions {
            debug!(
                count = transactions.len(),
                required = self.config.min_transactions,
                "Not enough transactions for anomaly detection"
            );
            return Vec::new();
        }

        let mut by_category: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for tx in transactions.iter().filter(|tx| tx.is_expense()) {
            by_category.entry(tx.category.as_str()).or_default().push(tx);
        }

        let mut reports = Vec::new();

        for (category, mut history) in by_category {
            if history.len() < self.config.min_category_points {
                continue;
            }

            let amounts: Vec<f64> = history.iter().map(|tx| tx.magnitude()).collect();
            let mean = mean(&amounts);
            let std_dev = sample_std_dev(&amounts, mean);

            if std_dev <= MIN_STD_DEV {
                debug!(category, "Skipping category with no variance");
                continue;
            }

            // Stable sort keeps source order for equal timestamps
            history.sort_by_key(|tx| tx.occurred_at);
            let recent_start = history.len().saturating_sub(self.config.recent_count);

            for tx in &history[recent_start..] {
                let amount = tx.magnitude();
                let z_score = (amount - mean).abs() / std_dev;
                if z_score <= z_threshold {
                    continue;
                }

                let direction = if amount > mean { "high" } else { "low" };
                debug!(
                    category,
                    transaction = tx.id.as_str(),
                    z_score,
                    "Spending anomaly detected"
                );

                reports.push(AnomalyReport {
                    transaction_id: tx.id.clone(),
                    category: category.to_string(),
                    amount: round2(amount),
                    z_score: round2(z_score),
                    category_mean: round2(mean),
                    occurred_at: tx.occurred_at,
                    message: format!("Unusually {} spending in {}", direction, category),
                });
            }
        }

        reports
    }
}

/// Arithmetic mean of a non-empty slice (0 for empty)
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator)
fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{expense, income};

    /// 19 alternating 45/55 food expenses followed by one at 90 (most recent)
    fn food_history_with_spike() -> Vec<Transaction> {
        let mut txs: Vec<Transaction> = (0..19)
            .map(|i| {
                let amount = if i % 2 == 0 { 45.0 } else { 55.0 };
                expense(&format!("food-{}", i), "Food", amount, 40 - i)
            })
            .collect();
        txs.push(expense("food-spike", "Food", 90.0, 0));
        txs
    }

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        // Sample variance = 32 / 7
        assert!((sample_std_dev(&values, m) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std_dev(&[3.0], 3.0), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_detects_recent_spike() {
        // The spike is part of its own category statistics, so z is bounded
        // by (n - 1) / sqrt(n); compare against the computed score instead
        let txs = food_history_with_spike();
        let reports = AnomalyDetector::new().detect(&txs, 2.0);

        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.transaction_id, "food-spike");
        assert_eq!(report.category, "Food");
        assert_eq!(report.amount, 90.0);
        assert!(report.z_score > 2.0);
        assert!(report.message.contains("high"));

        let amounts: Vec<f64> = txs.iter().map(|t| t.magnitude()).collect();
        let m = mean(&amounts);
        let expected = (90.0 - m) / sample_std_dev(&amounts, m);
        assert!((report.z_score - round2(expected)).abs() < 1e-9);
        assert_eq!(report.category_mean, round2(m));
    }

    #[test]
    fn test_fewer_than_ten_transactions() {
        let txs: Vec<Transaction> = food_history_with_spike().into_iter().skip(11).collect();
        assert_eq!(txs.len(), 9);
        assert!(AnomalyDetector::new().detect(&txs, 2.0).is_empty());
    }

    #[test]
    fn test_only_recent_five_are_scored() {
        // Spike is old; the five latest are ordinary
        let mut txs = vec![expense("old-spike", "Food", 500.0, 60)];
        for i in 0..12 {
            let amount = if i % 2 == 0 { 40.0 } else { 60.0 };
            txs.push(expense(&format!("f{}", i), "Food", amount, 20 - i));
        }

        let reports = AnomalyDetector::new().detect(&txs, 2.0);
        assert!(reports.is_empty());
    }

    #[test]
    fn test_unsorted_input_is_ordered_by_time() {
        let mut txs = food_history_with_spike();
        // Spike first in the input even though it is the newest
        txs.rotate_right(1);
        assert_eq!(txs[0].id, "food-spike");

        let reports = AnomalyDetector::new().detect(&txs, 2.0);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].transaction_id, "food-spike");
    }

    #[test]
    fn test_skips_small_and_flat_categories() {
        let mut txs = Vec::new();
        // Five points only: not enough to score
        for i in 0..4 {
            txs.push(expense(&format!("s{}", i), "Shopping", 10.0, 10 + i));
        }
        txs.push(expense("s-spike", "Shopping", 1000.0, 0));
        // Identical amounts: no variance
        for i in 0..8 {
            txs.push(expense(&format!("n{}", i), "Netflix", 15.99, i));
        }

        assert!(txs.len() >= 10);
        assert!(AnomalyDetector::new().detect(&txs, 2.0).is_empty());
    }

    #[test]
    fn test_income_is_ignored() {
        let mut txs = Vec::new();
        for i in 0..9 {
            txs.push(income(&format!("pay{}", i), 1000.0 + i as f64, 30 + i));
        }
        txs.push(income("bonus", 50_000.0, 0));
        assert!(AnomalyDetector::new().detect(&txs, 2.0).is_empty());
    }

    #[test]
    fn test_invalid_threshold_reports_nothing() {
        let txs: Vec<Transaction> = (0..12)
            .map(|i| {
                let amount = if i % 2 == 0 { 45.0 } else { 55.0 };
                expense(&format!("f{}", i), "Food", amount, 20 - i)
            })
            .collect();

        let detector = AnomalyDetector::new();
        for threshold in [f64::NAN, f64::NEG_INFINITY, -1.0, 0.0] {
            assert!(
                detector.detect(&txs, threshold).is_empty(),
                "threshold {} should report nothing",
                threshold
            );
        }
        // Sanity: a tiny positive threshold still scores every recent expense
        assert_eq!(detector.detect(&txs, 0.01).len(), 5);
    }

    #[test]
    fn test_threshold_is_respected() {
        let txs = food_history_with_spike();
        let reports = AnomalyDetector::new().detect(&txs, 100.0);
        assert!(reports.is_empty());

        let detector = AnomalyDetector::with_config(AnomalyConfig {
            z_threshold: 100.0,
            ..Default::default()
        });
        assert!(detector.detect_default(&txs).is_empty());
    }
}
