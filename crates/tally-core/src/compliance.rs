//! Budget compliance checks
//!
//! Compares spending against a budget's allocations. Each allocated category
//! yields at most one alert: `Exceeded` once the allocation is used up,
//! otherwise `Warning` from 90% utilization.

use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{round2, AlertSeverity, Budget, ComplianceAlert};

/// Utilization percentage that triggers a warning
pub const WARNING_THRESHOLD: f64 = 90.0;
/// Utilization percentage at which a category is over budget
pub const EXCEEDED_THRESHOLD: f64 = 100.0;

/// Checks spending against budget allocations
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceChecker;

impl ComplianceChecker {
    pub fn new() -> Self {
        Self
    }

    /// Alerts for allocated categories at or above the warning threshold
    ///
    /// Categories with spending but no allocation are ignored, and a zero
    /// allocation never alerts. Alerts come out in category name order.
    pub fn check(
        &self,
        current_spending: &BTreeMap<String, f64>,
        budget: &Budget,
    ) -> Vec<ComplianceAlert> {
        let alerts: Vec<ComplianceAlert> = budget
            .allocations
            .iter()
            .filter_map(|(category, allocated)| {
                let spent = current_spending.get(category).copied().unwrap_or(0.0);
                evaluate(category, *allocated, spent)
            })
            .collect();

        debug!(
            categories = budget.allocations.len(),
            alerts = alerts.len(),
            "Budget compliance checked"
        );

        alerts
    }
}

/// Spent as a percentage of allocated (0 when nothing is allocated)
pub fn utilization_percent(allocated: f64, spent: f64) -> f64 {
    if allocated > 0.0 {
        spent / allocated * 100.0
    } else {
        0.0
    }
}

/// Thresholds are compared against the reported (cent-rounded) utilization
fn evaluate(category: &str, allocated: f64, spent: f64) -> Option<ComplianceAlert> {
    let utilization = round2(utilization_percent(allocated, spent));

    let (severity, message) = if utilization >= EXCEEDED_THRESHOLD {
        (
            AlertSeverity::Exceeded,
            format!(
                "You have exceeded your {} budget by {:.2}",
                category,
                (spent - allocated).max(0.0)
            ),
        )
    } else if utilization >= WARNING_THRESHOLD {
        (
            AlertSeverity::Warning,
            format!(
                "You have spent {:.1}% of your {} budget",
                utilization, category
            ),
        )
    } else {
        return None;
    };

    Some(ComplianceAlert {
        category: category.to_string(),
        allocated: round2(allocated),
        spent: round2(spent),
        utilization_percent: utilization,
        severity,
        message,
    })
}
