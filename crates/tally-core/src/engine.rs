//! Engine facade
//!
//! [`FinanceEngine`] wires the analysis components to one resolved
//! [`EngineConfig`], so callers don't have to thread windows, thresholds and
//! the category table through every call.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{summarize, SpendingAnalyzer};
use crate::anomaly::AnomalyDetector;
use crate::budget::BudgetAllocator;
use crate::classify::CategoryClassifier;
use crate::compliance::ComplianceChecker;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{AnomalyReport, Budget, ComplianceAlert, SpendingAnalysis, Transaction};
use crate::report::{HealthReport, HealthReporter};

/// Month-to-date spending against a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub user_id: String,
    pub as_of: DateTime<Utc>,
    pub spending: SpendingAnalysis,
    pub alerts: Vec<ComplianceAlert>,
}

#[derive(Debug, Clone)]
pub struct FinanceEngine {
    config: EngineConfig,
    classifier: CategoryClassifier,
    detector: AnomalyDetector,
}

impl FinanceEngine {
    pub fn new(config: EngineConfig) -> Self {
        let classifier = CategoryClassifier::new(config.categories.clone());
        let detector = AnomalyDetector::with_config(config.anomaly.clone());
        debug!(
            categories = config.categories.len(),
            window_days = config.analysis.window_days,
            z_threshold = config.anomaly.z_threshold,
            "Finance engine ready"
        );
        Self {
            config,
            classifier,
            detector,
        }
    }

    /// Build from a config file (see [`EngineConfig::load`])
    pub fn from_config_path(path: Option<&Path>) -> Result<Self> {
        Ok(Self::new(EngineConfig::load(path)?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    pub fn classify(&self, description: &str) -> &str {
        self.classifier.classify(description)
    }

    /// Category names in match priority order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.classifier.categories()
    }

    /// Analyze over the configured window, ending now
    pub fn analyze(&self, transactions: &[Transaction]) -> SpendingAnalysis {
        self.analyze_window(transactions, self.config.analysis.window_days)
    }

    pub fn analyze_window(&self, transactions: &[Transaction], window_days: i64) -> SpendingAnalysis {
        SpendingAnalyzer::new().analyze(transactions, window_days)
    }

    /// Detect anomalies at the configured threshold, or `z_threshold` when given
    pub fn detect_anomalies(
        &self,
        transactions: &[Transaction],
        z_threshold: Option<f64>,
    ) -> Vec<AnomalyReport> {
        let threshold = z_threshold.unwrap_or(self.config.anomaly.z_threshold);
        let anomalies = self.detector.detect(transactions, threshold);
        debug!(
            threshold,
            anomalies = anomalies.len(),
            "Anomaly detection complete"
        );
        anomalies
    }

    pub fn generate_budget(
        &self,
        user_id: &str,
        historical: &[Transaction],
        monthly_income: f64,
        savings_goal: Option<f64>,
    ) -> Result<Budget> {
        BudgetAllocator::new().generate(user_id, historical, monthly_income, savings_goal)
    }

    pub fn check_compliance(
        &self,
        current_spending: &BTreeMap<String, f64>,
        budget: &Budget,
    ) -> Vec<ComplianceAlert> {
        ComplianceChecker::new().check(current_spending, budget)
    }

    /// Spending inside the budget month up to `now`, checked against the budget
    pub fn budget_status(
        &self,
        transactions: &[Transaction],
        budget: &Budget,
        now: DateTime<Utc>,
    ) -> BudgetStatus {
        let last_day = now.date_naive().min(budget.end_date);
        let window_days = (last_day - budget.start_date).num_days().max(0) + 1;
        let in_month = transactions
            .iter()
            .filter(|tx| tx.occurred_at <= now && budget.contains(tx.occurred_at.date_naive()));
        let spending = summarize(in_month, Some(window_days));
        let alerts = self.check_compliance(&spending.spending_by_category, budget);

        debug!(
            user_id = %budget.user_id,
            window_days,
            considered = spending.transaction_count,
            alerts = alerts.len(),
            "Budget status computed"
        );

        BudgetStatus {
            user_id: budget.user_id.clone(),
            as_of: now,
            spending,
            alerts,
        }
    }

    pub fn health_report(&self, transactions: &[Transaction], now: DateTime<Utc>) -> HealthReport {
        HealthReporter::new().report(transactions, now)
    }
}

impl Default for FinanceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
