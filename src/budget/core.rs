//! Defines the budget model and how it is stored.

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    budget::Period,
    database_id::DatabaseId,
    db::{get_parsed, optional_value},
    endpoints,
    resource::{Reference, Resource, validate_name, validate_positive},
};

/// A spending limit for a period, optionally restricted to one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The display name of the budget, e.g. "Groceries".
    pub name: String,
    /// The most that should be spent in each period.
    pub amount: f64,
    /// How often the budget resets.
    pub period: Period,
    /// Only count expenses in this category. Counts all expenses when `None`.
    #[serde(default)]
    pub category_id: Option<DatabaseId>,
    /// The first day the budget applies to.
    pub start_date: Date,
    /// The last day the budget applies to.
    ///
    /// When `None` the window is one period long, starting at `start_date`.
    #[serde(default)]
    pub end_date: Option<Date>,
}

impl Budget {
    /// The inclusive date range the budget covers.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the derived end date is out of range.
    pub fn window(&self) -> Result<(Date, Date), Error> {
        let end = match self.end_date {
            Some(end_date) => end_date,
            None => self.period.window_end(self.start_date)?,
        };

        Ok((self.start_date, end))
    }
}

impl Resource for Budget {
    const NAME: &'static str = "budget";
    const LABEL: &'static str = "Budget";
    const TABLE: &'static str = "budget";
    const ITEM_ENDPOINT: &'static str = endpoints::BUDGET;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "amount",
        "period",
        "category_id",
        "start_date",
        "end_date",
    ];
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "amount", "period", "start_date"];

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                period TEXT NOT NULL,
                category_id INTEGER REFERENCES category(id) ON DELETE SET NULL,
                start_date TEXT NOT NULL,
                end_date TEXT,
                created_at TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            name: row.get(offset)?,
            amount: row.get(offset + 1)?,
            period: get_parsed(row, offset + 2)?,
            category_id: row.get(offset + 3)?,
            start_date: row.get(offset + 4)?,
            end_date: row.get(offset + 5)?,
        })
    }

    fn to_sql_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Real(self.amount),
            Value::Text(self.period.to_string()),
            optional_value(self.category_id),
            Value::Text(self.start_date.to_string()),
            optional_value(self.end_date.map(|date| date.to_string())),
        ]
    }

    fn validate(&self) -> Result<(), Error> {
        validate_name("name", &self.name)?;
        validate_positive("amount", self.amount)?;

        if let Some(end_date) = self.end_date.filter(|end_date| *end_date < self.start_date) {
            return Err(Error::Validation(format!(
                "end_date {end_date} must not be before start_date {}",
                self.start_date
            )));
        }

        self.window()?;

        Ok(())
    }

    fn references(&self) -> Vec<Reference> {
        self.category_id
            .map(|id| Reference {
                field: "category_id",
                table: "category",
                id,
            })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Error, budget::Period, resource::Resource};

    use super::Budget;

    fn food_budget() -> Budget {
        Budget {
            name: "Food".to_owned(),
            amount: 500.0,
            period: Period::Monthly,
            category_id: Some(1),
            start_date: date!(2024 - 01 - 01),
            end_date: None,
        }
    }

    #[test]
    fn window_is_derived_from_period() {
        assert_eq!(
            food_budget().window(),
            Ok((date!(2024 - 01 - 01), date!(2024 - 01 - 31)))
        );
    }

    #[test]
    fn explicit_end_date_overrides_period() {
        let budget = Budget {
            end_date: Some(date!(2024 - 03 - 31)),
            ..food_budget()
        };

        assert_eq!(
            budget.window(),
            Ok((date!(2024 - 01 - 01), date!(2024 - 03 - 31)))
        );
    }

    #[test]
    fn non_positive_amount_is_invalid() {
        let budget = Budget {
            amount: 0.0,
            ..food_budget()
        };

        assert_eq!(
            budget.validate(),
            Err(Error::NonPositiveAmount { field: "amount" })
        );
    }

    #[test]
    fn end_before_start_is_invalid() {
        let budget = Budget {
            end_date: Some(date!(2023 - 12 - 31)),
            ..food_budget()
        };

        assert!(matches!(budget.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn window_past_the_last_date_is_invalid() {
        let budget = Budget {
            period: Period::Weekly,
            start_date: date!(9999 - 12 - 30),
            ..food_budget()
        };

        assert_eq!(
            budget.validate(),
            Err(Error::Validation(
                "start_date 9999-12-30 is out of range".to_owned()
            ))
        );
    }

    #[test]
    fn valid_budget_passes() {
        assert_eq!(food_budget().validate(), Ok(()));
    }
}
