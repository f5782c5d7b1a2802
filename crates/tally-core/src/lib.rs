//! Tally Core Library
//!
//! Analytics and budgeting engine for the Tally personal finance tool:
//! - Keyword-based transaction categorization
//! - Spending analysis over trailing windows
//! - Statistical anomaly detection
//! - 50/30/20 budget generation
//! - Budget compliance alerts
//! - Financial health reports
//! - CSV/JSON transaction import
//! - TOML engine configuration with embedded defaults

pub mod analysis;
pub mod anomaly;
pub mod budget;
pub mod classify;
pub mod compliance;
pub mod config;
pub mod engine;
pub mod error;
pub mod import;
pub mod models;
pub mod report;

/// Transaction fixtures pinned to a fixed clock
#[cfg(test)]
mod test_utils;

pub use analysis::SpendingAnalyzer;
pub use anomaly::{AnomalyConfig, AnomalyDetector};
pub use budget::{BudgetAllocator, BudgetClass};
pub use classify::{CategoryClassifier, CategoryKeywordMap, CategoryKeywords};
pub use compliance::ComplianceChecker;
pub use config::{AnalysisConfig, EngineConfig};
pub use engine::{BudgetStatus, FinanceEngine};
pub use error::{Error, Result};
pub use models::{
    AlertSeverity, AnomalyReport, Budget, ComplianceAlert, SpendingAnalysis, Transaction,
    TransactionType,
};
pub use report::{HealthReport, HealthReporter, Recommendation, SavingsTier};
