//! Report command implementations

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tally_core::{FinanceEngine, HealthReport, SavingsTier};

use super::{emit, load_transactions, money};
use crate::cli::OutputFormat;

pub fn cmd_report(engine: &FinanceEngine, file: &Path, format: OutputFormat) -> Result<()> {
    let transactions = load_transactions(engine, file)?;
    let report = engine.health_report(&transactions, Utc::now());

    emit(format, &report, print_report)
}

fn print_report(report: &HealthReport) {
    let metrics = &report.metrics;

    println!();
    println!("📈 Financial Health Report");
    println!(
        "   Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total income:   {:>12}", money(metrics.total_income));
    println!("   Total expenses: {:>12}", money(metrics.total_expenses));
    println!("   Net savings:    {:>12}", money(metrics.net_savings));

    let tier_icon = match report.savings_tier {
        SavingsTier::Strong => "🟢",
        SavingsTier::Moderate => "🟡",
        SavingsTier::Low => "🔴",
    };
    println!(
        "   Savings rate:   {:>11.2}% {} {}",
        metrics.savings_rate_percent, tier_icon, report.savings_tier
    );

    if let Some((category, amount)) = metrics.top_category() {
        println!("   Top category:   {} ({})", category, money(amount));
    }

    if !report.monthly_trends.is_empty() {
        println!();
        println!("   {:8} │ {:>12}", "Month", "Net");
        println!("   ─────────┼──────────────");
        for (month, net) in &report.monthly_trends {
            println!("   {:8} │ {:>12}", month, money(*net));
        }
    }

    println!();
    println!("   💡 Recommendations");
    for recommendation in &report.recommendations {
        println!("      • {}", recommendation.message());
    }
}
