//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/budgets/{budget_id}', use [format_endpoint].

/// The unauthenticated liveness check.
pub const HEALTH: &str = "/health";
/// The route to access transactions.
pub const TRANSACTIONS: &str = "/api/v1/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/v1/transactions/{transaction_id}";
/// The route to access accounts.
pub const ACCOUNTS: &str = "/api/v1/accounts";
/// The route to access a single account.
pub const ACCOUNT: &str = "/api/v1/accounts/{account_id}";
/// The route to access categories.
pub const CATEGORIES: &str = "/api/v1/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/v1/categories/{category_id}";
/// The route to access budgets.
pub const BUDGETS: &str = "/api/v1/budgets";
/// The route to access a single budget.
pub const BUDGET: &str = "/api/v1/budgets/{budget_id}";
/// The route to get the spending progress of a budget.
pub const BUDGET_PROGRESS: &str = "/api/v1/budgets/{budget_id}/progress";
/// The route to access goals.
pub const GOALS: &str = "/api/v1/goals";
/// The route to access a single goal.
pub const GOAL: &str = "/api/v1/goals/{goal_id}";
/// The route to get the progress of a goal.
pub const GOAL_PROGRESS: &str = "/api/v1/goals/{goal_id}/progress";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/goals/{goal_id}', '{goal_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
