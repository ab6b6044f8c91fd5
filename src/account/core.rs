//! Defines the account model and how it is stored.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::get_parsed,
    endpoints,
    resource::{Resource, validate_finite, validate_name},
};

/// The kind of financial account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// An everyday transaction account.
    Checking,
    /// A savings account.
    Savings,
    /// A credit card.
    Credit,
    /// An investment or brokerage account.
    Investment,
    /// Physical cash.
    Cash,
    /// Anything else.
    Other,
}

impl AccountType {
    /// The name used in JSON and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Credit => "credit",
            Self::Investment => "investment",
            Self::Cash => "cash",
            Self::Other => "other",
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "credit" => Ok(Self::Credit),
            "investment" => Ok(Self::Investment),
            "cash" => Ok(Self::Cash),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown account type \"{other}\"")),
        }
    }
}

fn default_currency() -> String {
    "USD".to_owned()
}

/// A bank account, credit card or other place money is held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The name of the account. Unique per user.
    pub name: String,
    /// The kind of account.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// The balance.
    #[serde(default)]
    pub balance: f64,
    /// The ISO 4217 currency code, e.g. "NZD".
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Resource for Account {
    const NAME: &'static str = "account";
    const LABEL: &'static str = "Account";
    const TABLE: &'static str = "account";
    const ITEM_ENDPOINT: &'static str = endpoints::ACCOUNT;
    const FIELDS: &'static [&'static str] = &["name", "type", "balance", "currency"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "type"];

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS account (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                \"type\" TEXT NOT NULL,
                balance REAL NOT NULL DEFAULT 0,
                currency TEXT NOT NULL DEFAULT 'USD',
                created_at TEXT NOT NULL,
                UNIQUE(user_id, name)
            )",
            (),
        )?;

        Ok(())
    }

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            name: row.get(offset)?,
            account_type: get_parsed(row, offset + 1)?,
            balance: row.get(offset + 2)?,
            currency: row.get(offset + 3)?,
        })
    }

    fn to_sql_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.account_type.to_string()),
            Value::Real(self.balance),
            Value::Text(self.currency.clone()),
        ]
    }

    fn validate(&self) -> Result<(), Error> {
        validate_name("name", &self.name)?;
        validate_finite("balance", self.balance)?;

        let is_currency_code =
            self.currency.len() == 3 && self.currency.chars().all(|c| c.is_ascii_uppercase());

        if is_currency_code {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "currency \"{}\" must be a three letter uppercase code, e.g. \"USD\"",
                self.currency
            )))
        }
    }

    fn conflict_error(&self) -> Error {
        Error::Conflict(format!("an account named \"{}\" already exists", self.name))
    }
}
