//! Route handlers shared by every resource type.
//!
//! Each handler is generic over the [Resource] and is registered once per
//! resource in the router, e.g. `post(create_record::<Account>)`.

use axum::{
    Json,
    extract::{FromRef, State},
    http::{HeaderName, StatusCode, header::LOCATION},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    AppState, Error,
    auth::AuthUser,
    database_id::DatabaseId,
    endpoints::format_endpoint,
    extract::{ApiJson, ApiPath},
    resource::{Record, Resource},
    store::{Query, SQLiteStore, Store},
    update::{apply_full_replacement, apply_partial_update},
};

/// The state needed to manage records.
#[derive(Debug, Clone)]
pub struct StoreState {
    /// The store for every resource type.
    pub store: SQLiteStore,
}

impl FromRef<AppState> for StoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The response body for reads.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    /// The record or records.
    pub data: T,
}

/// The response body for creates and full replacements.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    /// The stored record.
    pub data: T,
    /// A human readable summary of what happened.
    pub message: String,
}

/// The response body for partial updates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse<T> {
    /// The stored record.
    pub data: T,
    /// A human readable summary of what happened.
    pub message: String,
    /// The supplied fields that changed, in request order.
    pub updated_fields: Vec<String>,
}

/// A route handler that lists all of the user's records.
pub async fn list_records<R: Resource>(
    State(state): State<StoreState>,
    user: AuthUser,
) -> Result<Json<DataResponse<Vec<Record<R>>>>, Error> {
    let records = Store::<R>::find(&state.store, &user.user_id, &Query::default())?;

    Ok(Json(DataResponse { data: records }))
}

/// A route handler that gets one of the user's records.
pub async fn get_record<R: Resource>(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiPath(id): ApiPath<DatabaseId>,
) -> Result<Json<DataResponse<Record<R>>>, Error> {
    let record = Store::<R>::get(&state.store, &user.user_id, id)?;

    Ok(Json(DataResponse { data: record }))
}

/// A route handler that creates a record from a complete JSON object.
///
/// Responds with 201 Created and the new record's route in the `Location` header.
pub async fn create_record<R: Resource>(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiJson(input): ApiJson<Map<String, Value>>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<MessageResponse<Record<R>>>), Error> {
    let resource: R = apply_full_replacement(input)?;
    let record = state.store.insert(&user.user_id, resource)?;

    tracing::debug!("created {} {}", R::NAME, record.id);

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format_endpoint(R::ITEM_ENDPOINT, record.id))],
        Json(MessageResponse {
            data: record,
            message: format!("{} created successfully", R::LABEL),
        }),
    ))
}

/// A route handler that replaces every writable field of a record.
pub async fn replace_record<R: Resource>(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiPath(id): ApiPath<DatabaseId>,
    ApiJson(input): ApiJson<Map<String, Value>>,
) -> Result<Json<MessageResponse<Record<R>>>, Error> {
    Store::<R>::get(&state.store, &user.user_id, id)?;

    let resource: R = apply_full_replacement(input)?;
    let record = state.store.update(&user.user_id, id, resource)?;

    Ok(Json(MessageResponse {
        data: record,
        message: format!("{} updated successfully", R::LABEL),
    }))
}

/// A route handler that changes only the fields present in the request body.
pub async fn patch_record<R: Resource>(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiPath(id): ApiPath<DatabaseId>,
    ApiJson(patch): ApiJson<Map<String, Value>>,
) -> Result<Json<UpdateResponse<Record<R>>>, Error> {
    let existing: Record<R> = state.store.get(&user.user_id, id)?;

    let update = apply_partial_update(&existing.fields, patch)?;
    let record = state.store.update(&user.user_id, id, update.resource)?;

    Ok(Json(UpdateResponse {
        data: record,
        message: format!("{} updated successfully", R::LABEL),
        updated_fields: update.updated_fields,
    }))
}

/// A route handler that deletes a record, responding with 204 No Content.
pub async fn delete_record<R: Resource>(
    State(state): State<StoreState>,
    user: AuthUser,
    ApiPath(id): ApiPath<DatabaseId>,
) -> Result<StatusCode, Error> {
    Store::<R>::delete(&state.store, &user.user_id, id)?;

    tracing::debug!("deleted {} {id}", R::NAME);

    Ok(StatusCode::NO_CONTENT)
}
