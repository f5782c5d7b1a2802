//! Tally CLI - Personal finance analytics
//!
//! Usage:
//!   tally classify "Uber ride"              Show a description's category
//!   tally analyze --file tx.csv             Spending over the last 30 days
//!   tally anomalies --file tx.csv           Unusual recent expenses
//!   tally budget --file tx.csv --income N   Generate this month's budget
//!   tally report --file tx.csv              Financial health report

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let engine = commands::load_engine(cli.config.as_deref())?;
    let format = cli.format;

    match cli.command {
        Commands::Classify { description } => {
            commands::cmd_classify(&engine, &description, format)
        }
        Commands::Categories => commands::cmd_categories(&engine, format),
        Commands::Analyze { file, window } => {
            commands::cmd_analyze(&engine, &file, window, format)
        }
        Commands::Anomalies { file, threshold } => {
            commands::cmd_anomalies(&engine, &file, threshold, format)
        }
        Commands::Budget {
            file,
            income,
            savings_goal,
            user,
            output,
        } => commands::cmd_budget(
            &engine,
            &file,
            &user,
            income,
            savings_goal,
            output.as_deref(),
            format,
        ),
        Commands::Compliance { file, budget } => {
            commands::cmd_compliance(&engine, &file, &budget, format)
        }
        Commands::Report { file } => commands::cmd_report(&engine, &file, format),
    }
}
