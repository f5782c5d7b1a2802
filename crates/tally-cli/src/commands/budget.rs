//! Budget generation and compliance commands

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tally_core::{import, AlertSeverity, Budget, BudgetClass, FinanceEngine};
use tracing::info;

use super::{emit, load_transactions, money, truncate};
use crate::cli::OutputFormat;

pub fn cmd_budget(
    engine: &FinanceEngine,
    file: &Path,
    user_id: &str,
    monthly_income: f64,
    savings_goal: Option<f64>,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let transactions = load_transactions(engine, file)?;
    let budget = engine
        .generate_budget(user_id, &transactions, monthly_income, savings_goal)
        .context("Failed to generate budget")?;

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&budget)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Budget saved");
    }

    emit(format, &budget, print_budget)
}

fn print_budget(budget: &Budget) {
    println!();
    println!(
        "💰 Budget for {} ({} to {})",
        budget.user_id, budget.start_date, budget.end_date
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Monthly income: {}", money(budget.monthly_income));
    println!();

    if budget.allocations.is_empty() {
        println!("   No spending history to allocate from.");
    } else {
        println!("   {:25} │ {:>6} │ {:>12}", "Category", "Class", "Allocated");
        println!("   ──────────────────────────┼────────┼──────────────");
        for (category, amount) in &budget.allocations {
            println!(
                "   {:25} │ {:>6} │ {:>12.2}",
                truncate(category, 25),
                BudgetClass::for_category(category).as_str(),
                amount
            );
        }
        println!();
    }

    println!("   Total allocated:   {}", money(budget.total_allocated()));
    println!("   Projected savings: {}", money(budget.projected_savings()));
    if let Some(goal) = budget.savings_goal {
        if budget.meets_savings_goal() {
            println!("   ✅ Meets savings goal of {}", money(goal));
        } else {
            println!("   ⚠️  Falls short of savings goal of {}", money(goal));
        }
    }
}

pub fn cmd_compliance(
    engine: &FinanceEngine,
    file: &Path,
    budget_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let transactions = load_transactions(engine, file)?;
    let budget_file = File::open(budget_path)
        .with_context(|| format!("Failed to open {}", budget_path.display()))?;
    let budget = import::read_budget_json(budget_file)
        .with_context(|| format!("Failed to read budget from {}", budget_path.display()))?;

    let status = engine.budget_status(&transactions, &budget, Utc::now());

    emit(format, &status, |status| {
        println!();
        println!(
            "📋 Budget Compliance for {} ({} to {})",
            status.user_id, budget.start_date, budget.end_date
        );
        println!("   ─────────────────────────────────────────────────────────────");
        println!(
            "   Spent so far: {} of {}",
            money(status.spending.total_expenses),
            money(budget.total_allocated())
        );

        if status.alerts.is_empty() {
            println!("   ✅ All categories within budget.");
            return;
        }

        for alert in &status.alerts {
            let icon = match alert.severity {
                AlertSeverity::Exceeded => "🚨",
                AlertSeverity::Warning => "⚠️ ",
            };
            println!(
                "   {} {} ({} / {}, {:.1}%)",
                icon,
                alert.message,
                money(alert.spent),
                money(alert.allocated),
                alert.utilization_percent
            );
        }
    })
}
