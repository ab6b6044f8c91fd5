//! Defines the transaction model and how it is stored.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::DatabaseId,
    db::{get_parsed, optional_value},
    endpoints,
    resource::{Reference, Resource, validate_finite},
};

/// Whether money was earned, spent or moved between accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. wages.
    Income,
    /// Money spent. Only expenses count towards a budget.
    Expense,
    /// Money moved between two of the user's accounts.
    Transfer,
}

impl TransactionType {
    /// The name used in JSON and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            other => Err(format!("unknown transaction type \"{other}\"")),
        }
    }
}

/// An expense, income or transfer, i.e. an event where money moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The amount of money spent or earned in this transaction.
    ///
    /// Expenses may be recorded as either negative or positive amounts.
    pub amount: f64,
    /// Whether this is an income, expense or transfer.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    #[serde(default)]
    pub description: String,
    /// The category the transaction belongs to.
    #[serde(default)]
    pub category_id: Option<DatabaseId>,
    /// The account the money moved in or out of.
    #[serde(default)]
    pub account_id: Option<DatabaseId>,
}

impl Resource for Transaction {
    const NAME: &'static str = "transaction";
    const LABEL: &'static str = "Transaction";
    const TABLE: &'static str = "transaction";
    const ITEM_ENDPOINT: &'static str = endpoints::TRANSACTION;
    const FIELDS: &'static [&'static str] = &[
        "amount",
        "type",
        "date",
        "description",
        "category_id",
        "account_id",
    ];
    const REQUIRED_FIELDS: &'static [&'static str] = &["amount", "type", "date"];

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                amount REAL NOT NULL,
                \"type\" TEXT NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category_id INTEGER REFERENCES category(id) ON DELETE SET NULL,
                account_id INTEGER REFERENCES account(id) ON DELETE SET NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        )
    }

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            amount: row.get(offset)?,
            transaction_type: get_parsed(row, offset + 1)?,
            date: row.get(offset + 2)?,
            description: row.get(offset + 3)?,
            category_id: row.get(offset + 4)?,
            account_id: row.get(offset + 5)?,
        })
    }

    fn to_sql_values(&self) -> Vec<Value> {
        vec![
            Value::Real(self.amount),
            Value::Text(self.transaction_type.to_string()),
            Value::Text(self.date.to_string()),
            Value::Text(self.description.clone()),
            optional_value(self.category_id),
            optional_value(self.account_id),
        ]
    }

    fn validate(&self) -> Result<(), Error> {
        validate_finite("amount", self.amount)
    }

    fn references(&self) -> Vec<Reference> {
        let category = self.category_id.map(|id| Reference {
            field: "category_id",
            table: "category",
            id,
        });
        let account = self.account_id.map(|id| Reference {
            field: "account_id",
            table: "account",
            id,
        });

        category.into_iter().chain(account).collect()
    }
}
