//! Application router configuration.

use axum::{
    Json, Router, middleware,
    routing::get,
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    account::Account,
    budget::{Budget, get_budget, get_budget_progress, list_budgets},
    category::Category,
    crud::{create_record, delete_record, get_record, list_records, patch_record, replace_record},
    endpoints,
    goal::{Goal, get_goal, get_goal_progress, list_goals},
    logging::logging_middleware,
    transaction::{Transaction, list_transactions},
};

/// Return a router with all the app's routes.
///
/// Every route except [endpoints::HEALTH] requires a bearer token.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions).post(create_record::<Transaction>),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_record::<Transaction>)
                .patch(patch_record::<Transaction>)
                .put(replace_record::<Transaction>)
                .delete(delete_record::<Transaction>),
        )
        .route(
            endpoints::ACCOUNTS,
            get(list_records::<Account>).post(create_record::<Account>),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_record::<Account>)
                .patch(patch_record::<Account>)
                .put(replace_record::<Account>)
                .delete(delete_record::<Account>),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_records::<Category>).post(create_record::<Category>),
        )
        .route(
            endpoints::CATEGORY,
            get(get_record::<Category>)
                .patch(patch_record::<Category>)
                .put(replace_record::<Category>)
                .delete(delete_record::<Category>),
        )
        .route(
            endpoints::BUDGETS,
            get(list_budgets).post(create_record::<Budget>),
        )
        .route(
            endpoints::BUDGET,
            get(get_budget)
                .patch(patch_record::<Budget>)
                .put(replace_record::<Budget>)
                .delete(delete_record::<Budget>),
        )
        .route(endpoints::BUDGET_PROGRESS, get(get_budget_progress))
        .route(endpoints::GOALS, get(list_goals).post(create_record::<Goal>))
        .route(
            endpoints::GOAL,
            get(get_goal)
                .patch(patch_record::<Goal>)
                .put(replace_record::<Goal>)
                .delete(delete_record::<Goal>),
        )
        .route(endpoints::GOAL_PROGRESS, get(get_goal_progress))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Report that the server is up.
async fn get_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
