//! Route handlers for reading budgets with their progress.

use axum::{Json, extract::State};
use rusqlite::types::Value;
use serde::Serialize;

use crate::{
    Error,
    auth::{AuthUser, UserId},
    budget::Budget,
    crud::{DataResponse, StoreState},
    database_id::DatabaseId,
    extract::{ApiPath, ApiQuery},
    progress::{BudgetProgress, ProgressQuery, compute_budget_progress},
    resource::Record,
    store::{Condition, Query, SQLiteStore, Store},
    transaction::{Transaction, TransactionType},
};

/// A budget and, when requested, how much of it has been spent.
#[derive(Debug, Serialize)]
pub struct BudgetView {
    /// The stored budget.
    #[serde(flatten)]
    pub record: Record<Budget>,
    /// The spending so far in the budget's window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<BudgetProgress>,
}

/// Fetch the expenses that may count towards `budget` and compute its progress.
fn budget_progress(
    store: &SQLiteStore,
    owner: &UserId,
    budget: &Budget,
) -> Result<BudgetProgress, Error> {
    let (period_start, period_end) = budget.window()?;

    let mut conditions = vec![
        Condition::Equals("type", Value::Text(TransactionType::Expense.to_string())),
        Condition::AtLeast("date", Value::Text(period_start.to_string())),
        Condition::AtMost("date", Value::Text(period_end.to_string())),
    ];

    if let Some(category_id) = budget.category_id {
        conditions.push(Condition::Equals("category_id", Value::Integer(category_id)));
    }

    let query = Query {
        conditions,
        ..Default::default()
    };
    let transactions: Vec<Transaction> = Store::<Transaction>::find(store, owner, &query)?
        .into_iter()
        .map(|record| record.fields)
        .collect();

    compute_budget_progress(budget, &transactions)
}

fn to_view(
    store: &SQLiteStore,
    owner: &UserId,
    record: Record<Budget>,
    include_progress: bool,
) -> Result<BudgetView, Error> {
    let progress = if include_progress {
        Some(budget_progress(store, owner, &record.fields)?)
    } else {
        None
    };

    Ok(BudgetView { record, progress })
}

/// A route handler that lists the user's budgets.
pub async fn list_budgets(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<ProgressQuery>,
) -> Result<Json<DataResponse<Vec<BudgetView>>>, Error> {
    let budgets = Store::<Budget>::find(&state.store, &user.user_id, &Query::default())?
        .into_iter()
        .map(|record| to_view(&state.store, &user.user_id, record, query.include_progress))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DataResponse { data: budgets }))
}

/// A route handler that gets one of the user's budgets.
pub async fn get_budget(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiPath(id): ApiPath<DatabaseId>,
    ApiQuery(query): ApiQuery<ProgressQuery>,
) -> Result<Json<DataResponse<BudgetView>>, Error> {
    let record = Store::<Budget>::get(&state.store, &user.user_id, id)?;
    let budget = to_view(&state.store, &user.user_id, record, query.include_progress)?;

    Ok(Json(DataResponse { data: budget }))
}

/// A route handler that computes the progress of one of the user's budgets.
pub async fn get_budget_progress(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiPath(id): ApiPath<DatabaseId>,
) -> Result<Json<DataResponse<BudgetProgress>>, Error> {
    let record = Store::<Budget>::get(&state.store, &user.user_id, id)?;
    let progress = budget_progress(&state.store, &user.user_id, &record.fields)?;

    Ok(Json(DataResponse { data: progress }))
}
