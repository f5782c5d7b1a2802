//! Budget generation
//!
//! Allocations follow the 50/30/20 guideline: historical spend per category is
//! padded slightly and capped by class (needs vs. wants), then the whole plan
//! is scaled down proportionally if it would eat into the 20% savings share.

use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{month_bounds, round2, Budget, Transaction};

/// Share of income that allocations may use in total
pub const SPENDING_CEILING: f64 = 0.80;

const NEEDS_CATEGORIES: &[&str] = &["Utilities", "Healthcare", "Education"];
const WANTS_CATEGORIES: &[&str] = &["Entertainment", "Shopping", "Food & Dining"];

const NEEDS_GROWTH: f64 = 1.10;
const NEEDS_INCOME_CAP: f64 = 0.50;
const WANTS_GROWTH: f64 = 1.05;
const WANTS_INCOME_CAP: f64 = 0.30;

/// Budget class of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetClass {
    Needs,
    Wants,
    Other,
}

impl BudgetClass {
    pub fn for_category(category: &str) -> Self {
        if NEEDS_CATEGORIES.contains(&category) {
            Self::Needs
        } else if WANTS_CATEGORIES.contains(&category) {
            Self::Wants
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Needs => "needs",
            Self::Wants => "wants",
            Self::Other => "other",
        }
    }

    /// Tentative allocation for a category averaging `average` per transaction
    fn allocate(&self, average: f64, monthly_income: f64) -> f64 {
        match self {
            Self::Needs => (average * NEEDS_GROWTH).min(monthly_income * NEEDS_INCOME_CAP),
            Self::Wants => (average * WANTS_GROWTH).min(monthly_income * WANTS_INCOME_CAP),
            Self::Other => average,
        }
    }
}

impl std::fmt::Display for BudgetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builds monthly budgets from spending history
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetAllocator;

impl BudgetAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a budget for the current calendar month
    pub fn generate(
        &self,
        user_id: impl Into<String>,
        historical: &[Transaction],
        monthly_income: f64,
        savings_goal: Option<f64>,
    ) -> Result<Budget> {
        self.generate_for_month(
            user_id,
            historical,
            monthly_income,
            savings_goal,
            Utc::now().date_naive(),
        )
    }

    /// Generate a budget for the calendar month containing `today`
    ///
    /// Fails only for non-positive (or non-finite) income. An empty history
    /// produces a budget with no allocations.
    pub fn generate_for_month(
        &self,
        user_id: impl Into<String>,
        historical: &[Transaction],
        monthly_income: f64,
        savings_goal: Option<f64>,
        today: NaiveDate,
    ) -> Result<Budget> {
        if !monthly_income.is_finite() || monthly_income <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Monthly income must be positive, got {}",
                monthly_income
            )));
        }

        let allocations = allocate(&average_spending(historical), monthly_income);
        let (start_date, end_date) = month_bounds(today)?;

        info!(
            categories = allocations.len(),
            monthly_income,
            start = %start_date,
            "Generated budget"
        );

        Ok(Budget {
            user_id: user_id.into(),
            monthly_income,
            savings_goal,
            allocations,
            start_date,
            end_date,
        })
    }
}

/// Mean expense magnitude per category
fn average_spending(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        let entry = totals.entry(tx.category.clone()).or_insert((0.0, 0));
        entry.0 += tx.magnitude();
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(category, (sum, count))| (category, sum / count as f64))
        .collect()
}

/// Apply class rules and the spending ceiling, rounding last
fn allocate(averages: &BTreeMap<String, f64>, monthly_income: f64) -> BTreeMap<String, f64> {
    let mut tentative: BTreeMap<String, f64> = averages
        .iter()
        .map(|(category, average)| {
            let class = BudgetClass::for_category(category);
            (category.clone(), class.allocate(*average, monthly_income))
        })
        .collect();

    let ceiling = monthly_income * SPENDING_CEILING;
    let total: f64 = tentative.values().sum();
    if total > ceiling {
        let scale = ceiling / total;
        debug!(total, ceiling, scale, "Scaling allocations down to ceiling");
        for amount in tentative.values_mut() {
            *amount *= scale;
        }
    }

    tentative
        .into_iter()
        .map(|(category, amount)| (category, round2(amount)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{expense, income};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_budget_class() {
        assert_eq!(BudgetClass::for_category("Utilities"), BudgetClass::Needs);
        assert_eq!(BudgetClass::for_category("Food & Dining"), BudgetClass::Wants);
        assert_eq!(BudgetClass::for_category("Rent"), BudgetClass::Other);
        assert_eq!(BudgetClass::for_category("utilities"), BudgetClass::Other);
        assert_eq!(BudgetClass::Needs.to_string(), "needs");
        assert_eq!(BudgetClass::Wants.to_string(), "wants");
    }

    #[test]
    fn test_allocations_below_ceiling() {
        let history = vec![
            expense("u1", "Utilities", 100.0, 40),
            expense("u2", "Utilities", 140.0, 10),
            expense("e1", "Entertainment", 200.0, 5),
            expense("r1", "Rent", 900.0, 3),
            income("pay", 5000.0, 1),
        ];

        let budget = BudgetAllocator::new()
            .generate_for_month("user-1", &history, 5000.0, Some(500.0), day(2026, 3, 20))
            .unwrap();

        assert_eq!(budget.allocations.len(), 3);
        assert_eq!(budget.allocations["Utilities"], 132.0);
        assert_eq!(budget.allocations["Entertainment"], 210.0);
        assert_eq!(budget.allocations["Rent"], 900.0);
        assert_eq!(budget.user_id, "user-1");
        assert_eq!(budget.savings_goal, Some(500.0));
        assert_eq!(budget.start_date, day(2026, 3, 1));
        assert_eq!(budget.end_date, day(2026, 3, 31));
    }

    #[test]
    fn test_class_caps() {
        let history = vec![
            expense("h", "Healthcare", 900.0, 1),
            expense("s", "Shopping", 900.0, 1),
        ];

        // Caps: needs 50% of 1000, wants 30% of 1000; sum 800 is exactly the ceiling
        let budget = BudgetAllocator::new()
            .generate_for_month("u", &history, 1000.0, None, day(2026, 1, 15))
            .unwrap();

        assert_eq!(budget.allocations["Healthcare"], 500.0);
        assert_eq!(budget.allocations["Shopping"], 300.0);
    }

    #[test]
    fn test_scaled_to_ceiling() {
        let history = vec![
            expense("r", "Rent", 1500.0, 1),
            expense("f", "Food & Dining", 400.0, 2),
            expense("u", "Utilities", 200.0, 3),
        ];
        let income = 2000.0;

        let budget = BudgetAllocator::new()
            .generate_for_month("u", &history, income, None, day(2026, 2, 10))
            .unwrap();

        // Tentative: 1500 + 420 + 220 = 2140, scaled by 1600 / 2140
        let scale = 1600.0 / 2140.0;
        assert_eq!(budget.allocations["Rent"], round2(1500.0 * scale));
        assert_eq!(budget.allocations["Food & Dining"], round2(420.0 * scale));
        assert_eq!(budget.allocations["Utilities"], round2(220.0 * scale));

        let total: f64 = budget.allocations.values().sum();
        assert!(total <= income * SPENDING_CEILING + 0.01 * budget.allocations.len() as f64);
        assert_eq!(budget.end_date, day(2026, 2, 28));
    }

    #[test]
    fn test_average_is_per_transaction_mean() {
        let history = vec![
            expense("a", "Rent", 100.0, 1),
            expense("b", "Rent", 300.0, 2),
            expense("c", "Rent", -200.0, 3),
        ];

        let budget = BudgetAllocator::new()
            .generate_for_month("u", &history, 10_000.0, None, day(2026, 6, 1))
            .unwrap();
        assert_eq!(budget.allocations["Rent"], 200.0);
    }

    #[test]
    fn test_invalid_income() {
        let allocator = BudgetAllocator::new();
        for income in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let result = allocator.generate_for_month("u", &[], income, None, day(2026, 1, 1));
            assert!(matches!(result, Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_empty_history() {
        let budget = BudgetAllocator::new()
            .generate_for_month("u", &[], 3000.0, None, day(2026, 12, 5))
            .unwrap();

        assert!(budget.allocations.is_empty());
        assert_eq!(budget.start_date, day(2026, 12, 1));
        assert_eq!(budget.end_date, day(2026, 12, 31));
        assert_eq!(budget.projected_savings(), 3000.0);
    }

    #[test]
    fn test_ceiling_holds_for_many_incomes() {
        let history: Vec<Transaction> = ["Rent", "Utilities", "Shopping", "Travel", "Education"]
            .iter()
            .enumerate()
            .map(|(i, cat)| expense(&format!("t{}", i), cat, 250.0 + 130.0 * i as f64, 1))
            .collect();

        for income in [10.0, 333.33, 1000.0, 2500.0, 99_999.0] {
            let budget = BudgetAllocator::new()
                .generate_for_month("u", &history, income, None, day(2026, 4, 1))
                .unwrap();
            let total: f64 = budget.allocations.values().sum();
            assert!(
                total <= income * SPENDING_CEILING + 0.005 * history.len() as f64,
                "income {} allocated {}",
                income,
                total
            );
            assert!(budget.allocations.values().all(|a| *a >= 0.0));
        }
    }
}
