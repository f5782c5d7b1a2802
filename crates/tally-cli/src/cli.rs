//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Tally - Understand where your money goes
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal finance analytics and budgeting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (defaults to ~/.local/share/tally/config/engine.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the category a description maps to
    Classify {
        /// Transaction description
        description: String,
    },

    /// Summarize income and spending over a trailing window
    Analyze {
        /// Transactions file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Window in days (defaults to the configured window)
        #[arg(short, long)]
        window: Option<i64>,
    },

    /// Find unusual recent expenses
    Anomalies {
        /// Transactions file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Z-score threshold (defaults to the configured threshold)
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Generate a budget for the current month from spending history
    Budget {
        /// Transactions file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Monthly income
        #[arg(short, long)]
        income: f64,

        /// Monthly savings goal
        #[arg(long)]
        savings_goal: Option<f64>,

        /// User the budget belongs to
        #[arg(short, long, default_value = "default")]
        user: String,

        /// Write the budget as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check month-to-date spending against a saved budget
    Compliance {
        /// Transactions file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Budget JSON written by `tally budget --output`
        #[arg(short, long)]
        budget: PathBuf,
    },

    /// Financial health report over the whole history
    Report {
        /// Transactions file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List categories in match priority order
    Categories,
}
