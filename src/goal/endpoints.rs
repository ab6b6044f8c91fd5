//! Route handlers for reading goals with their progress.

use axum::{Json, extract::State};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    auth::AuthUser,
    crud::{DataResponse, StoreState},
    database_id::DatabaseId,
    extract::{ApiPath, ApiQuery},
    goal::Goal,
    progress::{GoalProgress, ProgressQuery, compute_goal_progress},
    resource::Record,
    store::{Query, Store},
};

/// A goal and, when requested, how close it is to being reached.
#[derive(Debug, Serialize)]
pub struct GoalView {
    /// The stored goal.
    #[serde(flatten)]
    pub record: Record<Goal>,
    /// The progress towards the target amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<GoalProgress>,
}

fn to_view(record: Record<Goal>, include_progress: bool) -> Result<GoalView, Error> {
    let progress = if include_progress {
        Some(compute_goal_progress(
            &record.fields,
            OffsetDateTime::now_utc().date(),
        )?)
    } else {
        None
    };

    Ok(GoalView { record, progress })
}

/// A route handler that lists the user's goals.
pub async fn list_goals(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<ProgressQuery>,
) -> Result<Json<DataResponse<Vec<GoalView>>>, Error> {
    let goals = Store::<Goal>::find(&state.store, &user.user_id, &Query::default())?
        .into_iter()
        .map(|record| to_view(record, query.include_progress))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DataResponse { data: goals }))
}

/// A route handler that gets one of the user's goals.
pub async fn get_goal(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiPath(id): ApiPath<DatabaseId>,
    ApiQuery(query): ApiQuery<ProgressQuery>,
) -> Result<Json<DataResponse<GoalView>>, Error> {
    let record = Store::<Goal>::get(&state.store, &user.user_id, id)?;

    Ok(Json(DataResponse {
        data: to_view(record, query.include_progress)?,
    }))
}

/// A route handler that computes the progress of one of the user's goals.
pub async fn get_goal_progress(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiPath(id): ApiPath<DatabaseId>,
) -> Result<Json<DataResponse<GoalProgress>>, Error> {
    let record = Store::<Goal>::get(&state.store, &user.user_id, id)?;
    let progress = compute_goal_progress(&record.fields, OffsetDateTime::now_utc().date())?;

    Ok(Json(DataResponse { data: progress }))
}
