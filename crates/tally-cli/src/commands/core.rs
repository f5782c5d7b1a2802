//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_engine` - Build the engine from the resolved config
//! - `load_transactions` - Read a CSV or JSON transaction file
//! - `emit` - Print a result in the selected output format
//! - `cmd_classify` / `cmd_categories` - Category lookups

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tally_core::{import, FinanceEngine, Transaction};
use tracing::debug;

use crate::cli::OutputFormat;

/// Build the engine from `--config`, the default override, or embedded defaults
pub fn load_engine(config_path: Option<&Path>) -> Result<FinanceEngine> {
    FinanceEngine::from_config_path(config_path).context("Failed to load engine config")
}

/// Read transactions, choosing the reader from the file extension
pub fn load_transactions(engine: &FinanceEngine, path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let transactions = if is_json {
        import::read_json(file)
    } else {
        import::read_csv(file, engine.classifier())
    }
    .with_context(|| format!("Failed to read transactions from {}", path.display()))?;

    debug!(
        path = %path.display(),
        count = transactions.len(),
        "Loaded transactions"
    );
    Ok(transactions)
}

/// Print `value` as JSON/YAML, or hand it to `table` for human output
pub fn emit<T: Serialize>(format: OutputFormat, value: &T, table: impl FnOnce(&T)) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
        }
        OutputFormat::Table => table(value),
    }
    Ok(())
}

/// Format a dollar amount
pub fn money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

#[derive(Serialize)]
struct Classification<'a> {
    description: &'a str,
    category: &'a str,
}

pub fn cmd_classify(engine: &FinanceEngine, description: &str, format: OutputFormat) -> Result<()> {
    let result = Classification {
        description,
        category: engine.classify(description),
    };

    emit(format, &result, |c| {
        println!("🏷️  {} → {}", c.description, c.category);
    })
}

pub fn cmd_categories(engine: &FinanceEngine, format: OutputFormat) -> Result<()> {
    let entries = engine.classifier().keyword_map().entries();

    emit(format, &entries, |entries| {
        println!();
        println!("🏷️  Categories (first match wins)");
        println!("   ─────────────────────────────────────────────────────────────");
        for (i, entry) in entries.iter().enumerate() {
            let keywords = if entry.keywords.is_empty() {
                "\x1b[2m(fallback)\x1b[0m".to_string()
            } else {
                entry.keywords.join(", ")
            };
            println!("   {:>2}. {:20} {}", i + 1, entry.name, keywords);
        }
    })
}
