//! Spending analysis and anomaly commands

use std::path::Path;

use anyhow::Result;
use tally_core::{FinanceEngine, SpendingAnalysis};

use super::{emit, load_transactions, money, truncate};
use crate::cli::OutputFormat;

pub fn cmd_analyze(
    engine: &FinanceEngine,
    file: &Path,
    window_days: Option<i64>,
    format: OutputFormat,
) -> Result<()> {
    let transactions = load_transactions(engine, file)?;
    let analysis = match window_days {
        Some(days) => engine.analyze_window(&transactions, days),
        None => engine.analyze(&transactions),
    };

    emit(format, &analysis, print_analysis)
}

fn print_analysis(analysis: &SpendingAnalysis) {
    println!();
    match analysis.window_days {
        Some(days) => println!("📊 Spending Analysis (last {} days)", days),
        None => println!("📊 Spending Analysis (all time)"),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if analysis.transaction_count == 0 {
        println!("   No transactions found in this window.");
        return;
    }

    println!("   Income:       {:>12}", money(analysis.total_income));
    println!("   Expenses:     {:>12}", money(analysis.total_expenses));
    println!("   Net savings:  {:>12}", money(analysis.net_savings));
    println!("   Savings rate: {:>11.2}%", analysis.savings_rate_percent);
    println!("   Transactions: {:>12}", analysis.transaction_count);

    if analysis.spending_by_category.is_empty() {
        return;
    }

    println!();
    println!("   {:25} │ {:>12} │ {:>6}", "Category", "Amount", "%");
    println!("   ──────────────────────────┼──────────────┼────────");

    let mut categories: Vec<_> = analysis.spending_by_category.iter().collect();
    categories.sort_by(|a, b| b.1.total_cmp(a.1));
    for (category, amount) in categories {
        let share = if analysis.total_expenses > 0.0 {
            amount / analysis.total_expenses * 100.0
        } else {
            0.0
        };
        println!(
            "   {:25} │ {:>12.2} │ {:>5.1}%",
            truncate(category, 25),
            amount,
            share
        );
    }
}

pub fn cmd_anomalies(
    engine: &FinanceEngine,
    file: &Path,
    threshold: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    if let Some(z) = threshold {
        if !z.is_finite() || z <= 0.0 {
            anyhow::bail!("--threshold must be a positive number, got {}", z);
        }
    }

    let transactions = load_transactions(engine, file)?;
    let anomalies = engine.detect_anomalies(&transactions, threshold);

    emit(format, &anomalies, |anomalies| {
        println!();
        println!("🔍 Spending Anomalies");
        println!("   ─────────────────────────────────────────────────────────────");

        if anomalies.is_empty() {
            println!("   ✅ Nothing unusual found.");
            return;
        }

        for anomaly in anomalies {
            println!(
                "   ⚠️  {} on {}: {} (mean {}, z = {:.2})",
                anomaly.message,
                anomaly.occurred_at.format("%Y-%m-%d"),
                money(anomaly.amount),
                money(anomaly.category_mean),
                anomaly.z_score
            );
        }
    })
}
