//! Financial health report
//!
//! Whole-history metrics, monthly net flow, a savings tier and rule-based
//! recommendations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::analysis::SpendingAnalyzer;
use crate::models::{round2, SpendingAnalysis, Transaction};

/// Entertainment share of expenses above which spending is called out
const ENTERTAINMENT_SHARE_LIMIT: f64 = 0.15;

/// Savings rate band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsTier {
    /// 20% or more
    Strong,
    /// 10% up to 20%
    Moderate,
    Low,
}

impl SavingsTier {
    pub fn from_rate(savings_rate_percent: f64) -> Self {
        if savings_rate_percent >= 20.0 {
            Self::Strong
        } else if savings_rate_percent >= 10.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for SavingsTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    IncreaseSavingsRate,
    LimitEntertainment,
    ConsiderInvesting,
    KeepMonitoring,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::IncreaseSavingsRate => {
                "Consider increasing your savings rate to at least 20% for better financial security."
            }
            Self::LimitEntertainment => {
                "Your entertainment spending seems high. Consider setting a monthly limit."
            }
            Self::ConsiderInvesting => {
                "Great savings rate! Consider exploring investment options for higher returns."
            }
            Self::KeepMonitoring => {
                "Your financial habits look good. Continue monitoring your spending regularly."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub generated_at: DateTime<Utc>,
    pub metrics: SpendingAnalysis,
    /// Net flow per month, keyed "YYYY-MM"
    pub monthly_trends: BTreeMap<String, f64>,
    pub savings_tier: SavingsTier,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HealthReporter;

impl HealthReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, transactions: &[Transaction], now: DateTime<Utc>) -> HealthReport {
        let metrics = SpendingAnalyzer::new().analyze_all(transactions);
        let monthly_trends = monthly_net_flow(transactions);
        let savings_tier = SavingsTier::from_rate(metrics.savings_rate_percent);
        let recommendations = recommend(&metrics);

        debug!(
            months = monthly_trends.len(),
            tier = savings_tier.as_str(),
            recommendations = recommendations.len(),
            "Health report generated"
        );

        HealthReport {
            generated_at: now,
            metrics,
            monthly_trends,
            savings_tier,
            recommendations,
        }
    }
}

fn monthly_net_flow(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for tx in transactions {
        let signed = if tx.is_income() {
            tx.magnitude()
        } else {
            -tx.magnitude()
        };
        *months
            .entry(tx.occurred_at.format("%Y-%m").to_string())
            .or_insert(0.0) += signed;
    }

    months
        .into_iter()
        .map(|(month, net)| (month, round2(net)))
        .collect()
}

fn recommend(metrics: &SpendingAnalysis) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let rate = metrics.savings_rate_percent;

    if rate < 10.0 {
        recommendations.push(Recommendation::IncreaseSavingsRate);
    }
    if metrics.spent_on("Entertainment") > metrics.total_expenses * ENTERTAINMENT_SHARE_LIMIT {
        recommendations.push(Recommendation::LimitEntertainment);
    }
    if rate > 20.0 {
        recommendations.push(Recommendation::ConsiderInvesting);
    }
    if recommendations.is_empty() {
        recommendations.push(Recommendation::KeepMonitoring);
    }

    recommendations
}
