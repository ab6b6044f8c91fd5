//! Filtering and paging for the transaction list.

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    auth::AuthUser,
    database_id::DatabaseId,
    extract::ApiQuery,
    pagination::{Pagination, PaginationConfig},
    resource::Record,
    store::{Condition, Query, SQLiteStore, SortOrder, Store},
    transaction::{Transaction, TransactionType},
};

/// The query parameters accepted by the transaction list.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TransactionFilters {
    /// The most transactions to return.
    pub limit: Option<u64>,
    /// The number of transactions to skip.
    pub offset: Option<u64>,
    /// Only include transactions in this category.
    pub category_id: Option<DatabaseId>,
    /// Only include transactions in this account.
    pub account_id: Option<DatabaseId>,
    /// Only include transactions of this type.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions on or after this date.
    pub start_date: Option<Date>,
    /// Only include transactions on or before this date.
    pub end_date: Option<Date>,
}

impl TransactionFilters {
    /// Convert the filters into store conditions.
    ///
    /// # Errors
    /// Returns [Error::BadRequest] if `start_date` is after `end_date`.
    pub fn conditions(&self) -> Result<Vec<Condition>, Error> {
        if let (Some(start_date), Some(end_date)) = (self.start_date, self.end_date) {
            if start_date > end_date {
                return Err(Error::BadRequest(format!(
                    "start_date {start_date} must not be after end_date {end_date}"
                )));
            }
        }

        let mut conditions = Vec::new();

        if let Some(category_id) = self.category_id {
            conditions.push(Condition::Equals("category_id", Value::Integer(category_id)));
        }

        if let Some(account_id) = self.account_id {
            conditions.push(Condition::Equals("account_id", Value::Integer(account_id)));
        }

        if let Some(transaction_type) = self.transaction_type {
            conditions.push(Condition::Equals(
                "type",
                Value::Text(transaction_type.to_string()),
            ));
        }

        if let Some(start_date) = self.start_date {
            conditions.push(Condition::AtLeast("date", Value::Text(start_date.to_string())));
        }

        if let Some(end_date) = self.end_date {
            conditions.push(Condition::AtMost("date", Value::Text(end_date.to_string())));
        }

        Ok(conditions)
    }
}

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct TransactionListState {
    /// The store for transactions.
    pub store: SQLiteStore,
    /// Controls the default and maximum page size.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The response body for the transaction list.
#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    /// The page of transactions, newest first.
    pub data: Vec<Record<Transaction>>,
    /// Describes the page.
    pub pagination: Pagination,
}

/// A route handler that lists a page of the user's transactions, newest first.
pub async fn list_transactions(
    State(state): State<TransactionListState>,
    user: AuthUser,
    ApiQuery(filters): ApiQuery<TransactionFilters>,
) -> Result<Json<TransactionListResponse>, Error> {
    let (limit, offset) = state
        .pagination_config
        .resolve(filters.limit, filters.offset)?;
    let conditions = filters.conditions()?;

    let total = Store::<Transaction>::count(&state.store, &user.user_id, &conditions)?;
    let query = Query {
        conditions,
        sort: vec![("date", SortOrder::Descending), ("id", SortOrder::Descending)],
        limit: Some(limit),
        offset,
    };
    let transactions = Store::<Transaction>::find(&state.store, &user.user_id, &query)?;

    Ok(Json(TransactionListResponse {
        data: transactions,
        pagination: Pagination {
            limit,
            offset,
            total,
        },
    }))
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;
    use time::macros::date;

    use crate::{Error, store::Condition, transaction::TransactionType};

    use super::TransactionFilters;

    #[test]
    fn no_filters_means_no_conditions() {
        assert_eq!(TransactionFilters::default().conditions(), Ok(vec![]));
    }

    #[test]
    fn date_range_and_type_become_conditions() {
        let filters = TransactionFilters {
            transaction_type: Some(TransactionType::Expense),
            start_date: Some(date!(2024 - 01 - 01)),
            end_date: Some(date!(2024 - 01 - 31)),
            ..Default::default()
        };

        assert_eq!(
            filters.conditions(),
            Ok(vec![
                Condition::Equals("type", Value::Text("expense".to_owned())),
                Condition::AtLeast("date", Value::Text("2024-01-01".to_owned())),
                Condition::AtMost("date", Value::Text("2024-01-31".to_owned())),
            ])
        );
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let filters = TransactionFilters {
            start_date: Some(date!(2024 - 02 - 01)),
            end_date: Some(date!(2024 - 01 - 01)),
            ..Default::default()
        };

        assert!(matches!(filters.conditions(), Err(Error::BadRequest(_))));
    }
}
