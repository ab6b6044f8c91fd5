//! Budget and goal progress, computed from the current data at read time.
//!
//! These are pure functions: the caller fetches the budget, goal and
//! transactions and the results are never stored.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    budget::Budget,
    goal::Goal,
    resource::validate_positive,
    transaction::{Transaction, TransactionType},
};

/// The query parameters for reads that may include progress.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProgressQuery {
    /// Whether to compute progress for each record.
    #[serde(default)]
    pub include_progress: bool,
}

/// How much of a budget has been spent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    /// The total of matching expenses, rounded to cents.
    pub spent: f64,
    /// The budget amount minus `spent`. Negative when overspent.
    pub remaining: f64,
    /// `spent` as a percentage of the budget amount, to one decimal place.
    ///
    /// Values above 100 mean the budget was overspent.
    pub percentage: f64,
    /// The first day of the window expenses were counted in.
    pub period_start: Date,
    /// The last day of the window expenses were counted in.
    pub period_end: Date,
    /// The number of expenses counted.
    pub transaction_count: usize,
    /// Whether more than the budget amount has been spent.
    pub is_over_budget: bool,
}

/// How close a goal is to being reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    /// The amount saved so far.
    pub current_amount: f64,
    /// The amount the user wants to reach.
    pub target_amount: f64,
    /// How much is left to save. Zero once the goal is reached.
    pub remaining: f64,
    /// `current_amount` as a percentage of `target_amount`, to one decimal place.
    pub percentage: f64,
    /// `percentage` clamped to between 0 and 100.
    pub display_percentage: f64,
    /// Whether `current_amount` has reached `target_amount`.
    pub is_complete: bool,
    /// Days from today until the target date, negative when overdue.
    pub days_remaining: Option<i64>,
}

/// Compute how much of `budget` has been spent.
///
/// Only expenses dated inside the budget's window count, and only those in
/// the budget's category when it has one. Expenses may be recorded with
/// either sign so their absolute values are summed.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the budget amount is not positive,
/// - or [Error::Validation] if the budget window cannot be computed.
pub fn compute_budget_progress(
    budget: &Budget,
    transactions: &[Transaction],
) -> Result<BudgetProgress, Error> {
    validate_positive("amount", budget.amount)?;

    let (period_start, period_end) = budget.window()?;

    let matching: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
        .filter(|transaction| transaction.date >= period_start && transaction.date <= period_end)
        .filter(|transaction| {
            budget
                .category_id
                .is_none_or(|category_id| transaction.category_id == Some(category_id))
        })
        .collect();

    let spent = round_to(
        matching
            .iter()
            .map(|transaction| transaction.amount.abs())
            .sum::<f64>(),
        2,
    );

    Ok(BudgetProgress {
        spent,
        remaining: budget.amount - spent,
        percentage: round_to(spent / budget.amount * 100.0, 1),
        period_start,
        period_end,
        transaction_count: matching.len(),
        is_over_budget: spent > budget.amount,
    })
}

/// Compute how close `goal` is to being reached as of `today`.
///
/// # Errors
/// Returns [Error::NonPositiveAmount] if the target amount is not positive.
pub fn compute_goal_progress(goal: &Goal, today: Date) -> Result<GoalProgress, Error> {
    validate_positive("target_amount", goal.target_amount)?;

    let percentage = round_to(goal.current_amount / goal.target_amount * 100.0, 1);

    Ok(GoalProgress {
        current_amount: goal.current_amount,
        target_amount: goal.target_amount,
        remaining: (goal.target_amount - goal.current_amount).max(0.0),
        percentage,
        display_percentage: percentage.clamp(0.0, 100.0),
        is_complete: goal.current_amount >= goal.target_amount,
        days_remaining: goal
            .target_date
            .map(|target_date| (target_date - today).whole_days()),
    })
}

fn round_to(value: f64, decimal_places: i32) -> f64 {
    let scale = 10f64.powi(decimal_places);

    (value * scale).round() / scale
}

#[cfg(test)]
mod budget_progress_tests {
    use time::{Date, macros::date};

    use crate::{
        Error,
        budget::{Budget, Period},
        transaction::{Transaction, TransactionType},
    };

    use super::compute_budget_progress;

    const FOOD: i64 = 1;
    const TRANSPORT: i64 = 2;

    fn food_budget() -> Budget {
        Budget {
            name: "Food".to_owned(),
            amount: 500.0,
            period: Period::Monthly,
            category_id: Some(FOOD),
            start_date: date!(2024 - 01 - 01),
            end_date: None,
        }
    }

    fn transaction(
        amount: f64,
        transaction_type: TransactionType,
        date: Date,
        category_id: Option<i64>,
    ) -> Transaction {
        Transaction {
            amount,
            transaction_type,
            date,
            description: String::new(),
            category_id,
            account_id: None,
        }
    }

    #[test]
    fn sums_matching_expenses_in_window() {
        let transactions = vec![
            transaction(-45.25, TransactionType::Expense, date!(2024 - 01 - 05), Some(FOOD)),
            transaction(-80.25, TransactionType::Expense, date!(2024 - 01 - 20), Some(FOOD)),
        ];

        let got = compute_budget_progress(&food_budget(), &transactions).unwrap();

        assert_eq!(got.spent, 125.5);
        assert_eq!(got.remaining, 374.5);
        assert_eq!(got.percentage, 25.1);
        assert_eq!(got.period_start, date!(2024 - 01 - 01));
        assert_eq!(got.period_end, date!(2024 - 01 - 31));
        assert_eq!(got.transaction_count, 2);
        assert!(!got.is_over_budget);
    }

    #[test]
    fn ignores_other_categories_types_and_dates() {
        let transactions = vec![
            transaction(-100.0, TransactionType::Expense, date!(2024 - 01 - 10), Some(FOOD)),
            transaction(-30.0, TransactionType::Expense, date!(2024 - 01 - 10), Some(TRANSPORT)),
            transaction(-30.0, TransactionType::Expense, date!(2024 - 01 - 10), None),
            transaction(200.0, TransactionType::Income, date!(2024 - 01 - 10), Some(FOOD)),
            transaction(-50.0, TransactionType::Transfer, date!(2024 - 01 - 10), Some(FOOD)),
            transaction(-30.0, TransactionType::Expense, date!(2023 - 12 - 31), Some(FOOD)),
            transaction(-30.0, TransactionType::Expense, date!(2024 - 02 - 01), Some(FOOD)),
        ];

        let got = compute_budget_progress(&food_budget(), &transactions).unwrap();

        assert_eq!(got.spent, 100.0);
        assert_eq!(got.transaction_count, 1);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let transactions = vec![
            transaction(-10.0, TransactionType::Expense, date!(2024 - 01 - 01), Some(FOOD)),
            transaction(-10.0, TransactionType::Expense, date!(2024 - 01 - 31), Some(FOOD)),
        ];

        let got = compute_budget_progress(&food_budget(), &transactions).unwrap();

        assert_eq!(got.transaction_count, 2);
    }

    #[test]
    fn uncategorised_budget_counts_all_expenses() {
        let budget = Budget {
            category_id: None,
            ..food_budget()
        };
        let transactions = vec![
            transaction(-10.0, TransactionType::Expense, date!(2024 - 01 - 03), Some(FOOD)),
            transaction(-15.0, TransactionType::Expense, date!(2024 - 01 - 04), Some(TRANSPORT)),
            transaction(-5.0, TransactionType::Expense, date!(2024 - 01 - 05), None),
        ];

        let got = compute_budget_progress(&budget, &transactions).unwrap();

        assert_eq!(got.spent, 30.0);
    }

    #[test]
    fn positive_and_negative_expenses_are_normalised() {
        let transactions = vec![
            transaction(-20.0, TransactionType::Expense, date!(2024 - 01 - 03), Some(FOOD)),
            transaction(30.0, TransactionType::Expense, date!(2024 - 01 - 04), Some(FOOD)),
        ];

        let got = compute_budget_progress(&food_budget(), &transactions).unwrap();

        assert_eq!(got.spent, 50.0);
    }

    #[test]
    fn overspend_is_reported_unclamped() {
        let transactions = vec![transaction(
            -650.0,
            TransactionType::Expense,
            date!(2024 - 01 - 10),
            Some(FOOD),
        )];

        let got = compute_budget_progress(&food_budget(), &transactions).unwrap();

        assert_eq!(got.remaining, -150.0);
        assert_eq!(got.percentage, 130.0);
        assert!(got.is_over_budget);
    }

    #[test]
    fn remaining_is_amount_minus_spent() {
        let transactions = vec![
            transaction(-0.1, TransactionType::Expense, date!(2024 - 01 - 02), Some(FOOD)),
            transaction(-0.2, TransactionType::Expense, date!(2024 - 01 - 03), Some(FOOD)),
            transaction(-33.33, TransactionType::Expense, date!(2024 - 01 - 04), Some(FOOD)),
        ];

        let got = compute_budget_progress(&food_budget(), &transactions).unwrap();

        assert_eq!(got.remaining, 500.0 - got.spent);
    }

    #[test]
    fn empty_ledger_has_zero_progress() {
        let got = compute_budget_progress(&food_budget(), &[]).unwrap();

        assert_eq!(got.spent, 0.0);
        assert_eq!(got.remaining, 500.0);
        assert_eq!(got.percentage, 0.0);
    }

    #[test]
    fn non_positive_amount_fails() {
        for amount in [0.0, -100.0, f64::NAN] {
            let budget = Budget {
                amount,
                ..food_budget()
            };

            assert_eq!(
                compute_budget_progress(&budget, &[]),
                Err(Error::NonPositiveAmount { field: "amount" })
            );
        }
    }
}
