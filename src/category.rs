//! This file defines the `Category` type.
//! A category groups transactions and budgets, e.g. "Groceries" or "Wages".

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::{get_parsed, optional_value},
    endpoints,
    resource::{Resource, validate_name},
};

/// Whether a category is for money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// A category for income.
    Income,
    /// A category for expenses.
    Expense,
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => f.write_str("income"),
            Self::Expense => f.write_str("expense"),
        }
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown category type \"{other}\"")),
        }
    }
}

/// A category for expenses and income, e.g., 'Groceries', 'Eating Out', 'Wages'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The name of the category. Unique per user.
    pub name: String,
    /// Whether the category is for income or expenses.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// A hex colour for display, e.g. "#33AA77".
    #[serde(default)]
    pub color: Option<String>,
}

impl Resource for Category {
    const NAME: &'static str = "category";
    const LABEL: &'static str = "Category";
    const TABLE: &'static str = "category";
    const ITEM_ENDPOINT: &'static str = endpoints::CATEGORY;
    const FIELDS: &'static [&'static str] = &["name", "type", "color"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "type"];

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                \"type\" TEXT NOT NULL,
                color TEXT,
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
            category_type: get_parsed(row, offset + 1)?,
            color: row.get(offset + 2)?,
        })
    }

    fn to_sql_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.category_type.to_string()),
            optional_value(self.color.clone()),
        ]
    }

    fn validate(&self) -> Result<(), Error> {
        validate_name("name", &self.name)?;

        match &self.color {
            Some(color) if !is_hex_colour(color) => Err(Error::Validation(format!(
                "color \"{color}\" must be a hex colour like \"#33AA77\""
            ))),
            _ => Ok(()),
        }
    }

    fn conflict_error(&self) -> Error {
        Error::Conflict(format!("a category named \"{}\" already exists", self.name))
    }
}

fn is_hex_colour(text: &str) -> bool {
    text.strip_prefix('#')
        .is_some_and(|digits| digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use crate::{Error, resource::Resource};

    use super::{Category, CategoryType, is_hex_colour};

    #[test]
    fn hex_colours() {
        assert!(is_hex_colour("#33aa77"));
        assert!(is_hex_colour("#FFFFFF"));
        assert!(!is_hex_colour("33AA77"));
        assert!(!is_hex_colour("#FFF"));
        assert!(!is_hex_colour("#GGGGGG"));
    }

    #[test]
    fn invalid_colour_fails_validation() {
        let category = Category {
            name: "Rent".to_owned(),
            category_type: CategoryType::Expense,
            color: Some("red".to_owned()),
        };

        assert!(matches!(category.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn missing_colour_is_valid() {
        let category = Category {
            name: "Wages".to_owned(),
            category_type: CategoryType::Income,
            color: None,
        };

        assert_eq!(category.validate(), Ok(()));
    }
}
