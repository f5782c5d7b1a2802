//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (engine/transaction loading, output) and the
//!   classify/categories commands
//! - `analysis` - Spending analysis and anomaly detection
//! - `budget` - Budget generation and compliance checks
//! - `reports` - Financial health report

pub mod analysis;
pub mod budget;
pub mod core;
pub mod reports;

// Re-export command functions for main.rs
pub use analysis::*;
pub use budget::*;
pub use core::*;
pub use reports::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
